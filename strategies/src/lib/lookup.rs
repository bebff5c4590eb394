use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::StrategyError;
use crate::params::ParamValue;

/// A verification routine exposed by an identity lookup target.
///
/// Receives the resolved required parameters as positional arguments, in
/// declaration order, and returns the authenticated identity or None to
/// reject.
#[async_trait]
pub trait VerificationRoutine<I>: Send + Sync + 'static {
    async fn verify(&self, args: &[ParamValue]) -> Result<Option<I>, StrategyError>;

    /// Number of positional arguments the routine expects, if fixed.
    /// Checked against the strategy's required parameters at registration.
    fn arity(&self) -> Option<usize> {
        None
    }
}

/// Adapts a synchronous closure into a verification routine.
pub struct FnRoutine<F, I> {
    f: F,
    arity: Option<usize>,
    _identity: PhantomData<fn() -> I>,
}

impl<F, I> FnRoutine<F, I>
where
    F: Fn(&[ParamValue]) -> Option<I> + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            arity: None,
            _identity: PhantomData,
        }
    }

    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = Some(arity);
        self
    }
}

#[async_trait]
impl<F, I> VerificationRoutine<I> for FnRoutine<F, I>
where
    F: Fn(&[ParamValue]) -> Option<I> + Send + Sync + 'static,
    I: Send + 'static,
{
    async fn verify(&self, args: &[ParamValue]) -> Result<Option<I>, StrategyError> {
        Ok((self.f)(args))
    }

    fn arity(&self) -> Option<usize> {
        self.arity
    }
}

/// A named identity type together with the verification routines it offers.
///
/// Routines are registered by name up front; strategies resolve the one they
/// are configured with when they are registered.
pub struct IdentityLookup<I> {
    name: String,
    routines: BTreeMap<String, Arc<dyn VerificationRoutine<I>>>,
}

impl<I> IdentityLookup<I>
where
    I: Send + 'static,
{
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            routines: BTreeMap::new(),
        }
    }

    /// Register a routine under a name, replacing any previous one.
    pub fn with_routine<R>(mut self, name: impl Into<String>, routine: R) -> Self
    where
        R: VerificationRoutine<I>,
    {
        self.routines.insert(name.into(), Arc::new(routine));
        self
    }

    /// Register a synchronous closure as a routine.
    pub fn with_fn<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[ParamValue]) -> Option<I> + Send + Sync + 'static,
    {
        self.with_routine(name, FnRoutine::new(f))
    }
}

impl<I> IdentityLookup<I> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn routine(&self, name: &str) -> Option<Arc<dyn VerificationRoutine<I>>> {
        self.routines.get(name).cloned()
    }

    pub fn routine_names(&self) -> impl Iterator<Item = &str> {
        self.routines.keys().map(String::as_str)
    }
}

impl<I> fmt::Debug for IdentityLookup<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityLookup")
            .field("name", &self.name)
            .field("routines", &self.routines.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fn_routine_receives_arguments() {
        let lookup = IdentityLookup::new("User").with_fn("authenticate", |args| {
            (args.first()?.as_str()? == "fred").then(|| "fred".to_string())
        });

        let routine = lookup.routine("authenticate").expect("Routine missing");

        assert_eq!(
            routine.verify(&[ParamValue::from("fred")]).await.unwrap(),
            Some("fred".to_string())
        );
        assert_eq!(routine.verify(&[ParamValue::from("barney")]).await.unwrap(), None);
    }

    #[test]
    fn test_unknown_routine() {
        let lookup: IdentityLookup<String> = IdentityLookup::new("User");
        assert!(lookup.routine("authenticate").is_none());
    }

    #[test]
    fn test_fn_routine_arity() {
        let routine: FnRoutine<_, String> = FnRoutine::new(|_: &[ParamValue]| None).with_arity(2);
        assert_eq!(VerificationRoutine::arity(&routine), Some(2));
    }
}
