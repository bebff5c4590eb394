pub mod extractor;
pub mod spec;
pub mod tree;

pub use extractor::extract;
pub use extractor::RequestContext;
pub use spec::ParamSpec;
pub use tree::ParamTree;
pub use tree::ParamValue;
