use std::{
    any::{type_name, TypeId},
    collections::HashMap,
    fmt::Debug,
    sync::{Arc, Mutex, PoisonError},
};

use crate::{
    cook_book::CookBook,
    errors::{ComposeError, GetError},
    recipe::{Activation, Lifetime, RecipeSource},
    types::{Injectable, Instance, TypeInfo},
};

/// Constructs the types of a [CookBook] on demand and caches the singletons
///
/// Every singleton owns a slot which is locked while the product is constructed,
/// so concurrent first requests construct it exactly once.
/// Slots are locked dependent first, the cook book has no cycles, so there is no lock-order inversion.
pub struct RuntimeManufactory {
    cook_book: CookBook,
    singletons: HashMap<TypeId, Mutex<Option<Instance>>>,
}
impl Debug for RuntimeManufactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_struct("RuntimeManufactory");
        for recipe in self.cook_book.recipes() {
            let info = recipe.info();
            let val = if recipe.is_instance() {
                "instance"
            } else if recipe.lifetime() == Lifetime::Transient {
                "transient"
            } else if self.is_constructed_info(info) {
                "constructed"
            } else {
                "pending"
            };
            map.field(info.type_name, &val);
        }
        map.finish()
    }
}

impl RuntimeManufactory {
    /// Checks the cook book and constructs all primary, then all required types
    pub fn new(cook_book: CookBook) -> Result<Arc<Self>, ComposeError> {
        cook_book.check_completeness()?;

        let singletons = cook_book
            .recipes()
            .filter(|recipe| recipe.lifetime() == Lifetime::Singleton && !recipe.is_instance())
            .map(|recipe| (recipe.info().type_id, Mutex::new(None)))
            .collect();

        let manufactory = Arc::new(RuntimeManufactory {
            cook_book,
            singletons,
        });

        manufactory.activate(Activation::Primary)?;
        manufactory.activate(Activation::Required)?;

        Ok(manufactory)
    }

    fn activate(&self, activation: Activation) -> Result<(), ComposeError> {
        for recipe in self.cook_book.activated(activation) {
            let info = recipe.info();
            tracing::debug!("Activating {:?} {}", activation, info.type_name);

            self.get_instance(info)
                .map_err(|source| ComposeError::Activation {
                    product: info.type_name,
                    source,
                })?;
        }

        Ok(())
    }

    /// Attempts to get the requested type, constructing it and its dependencies if needed
    pub fn get<T: Injectable>(&self) -> Result<Arc<T>, GetError> {
        self.get_instance(TypeInfo::of::<T>())?
            .downcast()
            .map_err(|actual_type| GetError::DowncastFailed {
                required_type: type_name::<T>(),
                actual_type,
            })
    }

    /// Type erased version of [RuntimeManufactory::get]
    pub fn get_instance(&self, info: TypeInfo) -> Result<Instance, GetError> {
        let Some(recipe) = self.cook_book.recipe(&info.type_id) else {
            return Err(GetError::TypeMissing(info.type_name));
        };

        let construct = match recipe.source() {
            RecipeSource::Instance(instance) => return Ok(instance.clone()),
            RecipeSource::Factory(construct) => construct,
        };

        let Some(slot) = self.singletons.get(&info.type_id) else {
            // Transient - every request gets its own product
            return construct(self).inspect_err(|e| {
                tracing::error!("Failed to construct {}: {}", info.type_name, e);
            });
        };

        // A poisoned slot only means a factory panicked, the slot itself is still None
        let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(instance) = slot.as_ref() {
            return Ok(instance.clone());
        }

        // Failures leave the slot empty so later requests may try again
        let instance = construct(self).inspect_err(|e| {
            tracing::error!("Failed to construct {}: {}", info.type_name, e);
        })?;
        tracing::debug!("Constructed instance of {}", info.type_name);

        *slot = Some(instance.clone());
        Ok(instance)
    }

    /// Whether a singleton of this type has been constructed already
    ///
    /// Instances registered as values always count as constructed, transient types never do.
    pub fn is_constructed<T: Injectable>(&self) -> bool {
        self.is_constructed_info(TypeInfo::of::<T>())
    }

    pub fn produces<T: Injectable>(&self) -> bool {
        self.has_recipe(TypeInfo::of::<T>())
    }

    /// Type erased version of [RuntimeManufactory::produces]
    pub fn has_recipe(&self, info: TypeInfo) -> bool {
        self.cook_book.recipe(&info.type_id).is_some()
    }

    pub fn cook_book(&self) -> &CookBook {
        &self.cook_book
    }

    fn is_constructed_info(&self, info: TypeInfo) -> bool {
        match self.singletons.get(&info.type_id) {
            Some(slot) => slot
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .is_some(),
            None => self
                .cook_book
                .recipe(&info.type_id)
                .is_some_and(|recipe| recipe.is_instance()),
        }
    }
}
