use crate::params::spec::ParamSpec;
use crate::params::tree::ParamTree;
use crate::params::tree::ParamValue;

/// Everything a specifier may read while resolving: the request's parameters
/// and the scope the strategy runs in.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    pub params: &'a ParamTree,
    pub scope: Option<&'a str>,
}

impl<'a> RequestContext<'a> {
    pub fn new(params: &'a ParamTree, scope: Option<&'a str>) -> Self {
        Self { params, scope }
    }
}

/// Resolve one specifier against the request.
///
/// Never mutates the tree. A missing key, or a path that runs into a scalar
/// before its last segment, yields None.
pub fn extract(spec: &ParamSpec, context: &RequestContext<'_>) -> Option<ParamValue> {
    match spec {
        ParamSpec::Literal(key) => context.params.get(key).cloned(),
        ParamSpec::NestedPath(segments) => {
            let (last, parents) = segments.split_last()?;
            let mut tree = context.params;
            for segment in parents {
                tree = tree.get(segment)?.as_tree()?;
            }
            tree.get(last).cloned()
        }
        ParamSpec::Computed(f) => f(context),
    }
}
