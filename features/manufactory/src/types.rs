use std::{
    any::{Any, TypeId},
    sync::Arc,
};

/// Boxed error returned by factories, errors holding it share it behind an `Arc` to stay `Clone`
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// A manufactory may be shared between threads once composed
/// So anything it produces needs to be Send + Sync + 'static
pub trait Injectable: Send + Sync + 'static {}
impl<T: Send + Sync + 'static> Injectable for T {}

/// Type erased product of a recipe
#[derive(Clone)]
pub struct Instance {
    pub info: TypeInfo,
    pub instance: Arc<dyn Any + Send + Sync + 'static>,
}

impl Instance {
    pub(crate) fn new<Product: Injectable>(instance: Product) -> Self {
        Self::shared(Arc::new(instance))
    }

    pub(crate) fn shared<Product: Injectable>(instance: Arc<Product>) -> Self {
        Instance {
            info: TypeInfo::of::<Product>(),
            instance,
        }
    }

    pub fn downcast<T: Injectable>(&self) -> Result<Arc<T>, &'static str> {
        match Arc::downcast::<T>(self.instance.clone()) {
            Ok(downcasted) => Ok(downcasted),
            Err(_) => Err(self.info.type_name),
        }
    }

    /// Whether both handles point to the same allocation
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.instance, &other.instance)
    }
}

/// Information about a factory parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyInfo {
    /// The required Type
    pub type_info: TypeInfo,
    /// If it is optional or required
    pub optional: bool,
}

impl DependencyInfo {
    pub fn required<T: 'static + ?Sized>() -> Self {
        DependencyInfo {
            type_info: TypeInfo::of::<T>(),
            optional: false,
        }
    }
}

/// Type Name and Type Id
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct TypeInfo {
    pub type_name: &'static str,
    pub type_id: TypeId,
}
impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}
impl TypeInfo {
    pub fn of<T: 'static + ?Sized>() -> TypeInfo {
        TypeInfo {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }
}
