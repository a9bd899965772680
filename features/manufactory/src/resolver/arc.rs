use std::sync::Arc;

use crate::{
    errors::GetError,
    resolver::Resolver,
    runtime::RuntimeManufactory,
    types::{DependencyInfo, Injectable},
};

impl<T: Injectable> Resolver for Arc<T> {
    fn resolve(manufactory: &RuntimeManufactory) -> Result<Self, GetError> {
        manufactory.get::<T>()
    }

    fn dependency_info() -> DependencyInfo {
        DependencyInfo::required::<T>()
    }
}

impl<Resolvable: Resolver> Resolver for Option<Resolvable> {
    fn resolve(manufactory: &RuntimeManufactory) -> Result<Self, GetError> {
        Resolvable::resolve_optional(manufactory)
    }

    fn dependency_info() -> DependencyInfo {
        let original = Resolvable::dependency_info();
        DependencyInfo {
            optional: true,
            ..original
        }
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;
    use crate::{component::Component, cook_book::CookBook, types::TypeInfo};

    struct Metrics;
    struct Broken;
    struct Reporter {
        metrics: Option<Arc<Metrics>>,
    }

    fn reporter(metrics: Option<Arc<Metrics>>) -> Result<Reporter, Infallible> {
        Ok(Reporter { metrics })
    }

    fn runtime(component: Component) -> Arc<RuntimeManufactory> {
        RuntimeManufactory::new(CookBook::new(&component, vec![])).unwrap()
    }

    #[test]
    fn absent_producers_resolve_to_none() {
        let manufactory = runtime(
            Component::accumulator("reporting")
                .add_retained_factory(reporter)
                .build()
                .unwrap(),
        );

        assert!(manufactory.get::<Reporter>().unwrap().metrics.is_none());
    }

    #[test]
    fn present_producers_resolve_to_some() {
        let manufactory = runtime(
            Component::accumulator("reporting")
                .add_instance(Metrics)
                .add_retained_factory(reporter)
                .build()
                .unwrap(),
        );

        let metrics = manufactory.get::<Metrics>().unwrap();
        let reported = manufactory.get::<Reporter>().unwrap();
        assert!(Arc::ptr_eq(reported.metrics.as_ref().unwrap(), &metrics));
    }

    #[test]
    fn failing_producers_are_not_hidden() {
        let manufactory = runtime(
            Component::accumulator("reporting")
                .add_retained_factory(|| Err::<Broken, _>("unavailable"))
                .build()
                .unwrap(),
        );

        let result = Option::<Arc<Broken>>::resolve(&manufactory);
        assert!(matches!(result, Err(GetError::FactoryFailed { .. })));
        assert_eq!(
            Option::<Arc<Broken>>::dependency_info().type_info,
            TypeInfo::of::<Broken>()
        );
    }
}
