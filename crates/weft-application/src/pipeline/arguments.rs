//! Type-erased argument lists

use std::any::{Any, type_name};
use std::fmt;

use weft_domain::error::{Error, Result};

/// Boxed return value carried by an invocation
pub type ReturnValue = Box<dyn Any + Send>;

/// Placeholder left behind by [`Arguments::take`]
struct Consumed;

/// Live argument list of one call.
///
/// Interceptors may read, replace or mutate any slot; the target body sees
/// whatever the slots hold when the chain reaches it.
#[derive(Default)]
pub struct Arguments {
    values: Vec<Box<dyn Any + Send>>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Arguments::push`]
    #[must_use]
    pub fn with<T: Any + Send>(mut self, value: T) -> Self {
        self.push(value);
        self
    }

    pub fn push<T: Any + Send>(&mut self, value: T) {
        self.values.push(Box::new(value));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get<T: Any>(&self, index: usize) -> Result<&T> {
        let slot = self.slot(index)?;
        if slot.is::<Consumed>() {
            return Err(consumed(index));
        }
        slot.downcast_ref::<T>()
            .ok_or_else(|| mismatch::<T>(index))
    }

    pub fn get_mut<T: Any>(&mut self, index: usize) -> Result<&mut T> {
        let slot = self.slot_mut(index)?;
        if (**slot).is::<Consumed>() {
            return Err(consumed(index));
        }
        (**slot)
            .downcast_mut::<T>()
            .ok_or_else(|| mismatch::<T>(index))
    }

    /// Replace slot `index`; the new value may have a different type
    pub fn set<T: Any + Send>(&mut self, index: usize, value: T) -> Result<()> {
        let slot = self.slot_mut(index)?;
        *slot = Box::new(value);
        Ok(())
    }

    /// Move the value out of slot `index`, leaving it consumed
    pub fn take<T: Any>(&mut self, index: usize) -> Result<T> {
        let slot = self.slot_mut(index)?;
        if (**slot).is::<Consumed>() {
            return Err(consumed(index));
        }
        if !(**slot).is::<T>() {
            return Err(mismatch::<T>(index));
        }
        let value = std::mem::replace(slot, Box::new(Consumed));
        value
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| mismatch::<T>(index))
    }

    fn slot(&self, index: usize) -> Result<&(dyn Any + Send)> {
        let len = self.values.len();
        self.values
            .get(index)
            .map(|value| &**value)
            .ok_or_else(|| out_of_range(index, len))
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut Box<dyn Any + Send>> {
        let len = self.values.len();
        self.values
            .get_mut(index)
            .ok_or_else(|| out_of_range(index, len))
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments")
            .field("len", &self.values.len())
            .finish()
    }
}

fn out_of_range(index: usize, len: usize) -> Error {
    Error::argument(index, format!("out of range for {len} arguments"))
}

fn consumed(index: usize) -> Error {
    Error::argument(index, "already consumed")
}

fn mismatch<T: ?Sized>(index: usize) -> Error {
    Error::argument(index, format!("expected {}", type_name::<T>()))
}
