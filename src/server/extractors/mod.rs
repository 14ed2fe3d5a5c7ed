mod proxy_base_extractor;

pub use proxy_base_extractor::*;
