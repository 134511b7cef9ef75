use crate::errors::PropertyTestResult;
use crate::models::value::{ TypeDescriptor, Value };

/// Strategy for producing synthetic property values
pub trait ValueFactory {
    /// Whether this factory can build values of `ty`; must not change within a run
    fn can_create_instance(&self, ty: &TypeDescriptor) -> bool;

    /// Builds a value assignable to `ty`.
    ///
    /// Repeated calls for a supported type must be able to yield at least two
    /// distinct values; the property tester reports a factory that cannot.
    fn create_random_value(&mut self, ty: &TypeDescriptor) -> PropertyTestResult<Value>;

    /// Called by the property tester before each verification pass so that
    /// per-run state does not leak from one pass into the next
    fn begin_run(&mut self) {}
}

impl<F: ValueFactory + ?Sized> ValueFactory for Box<F> {
    fn can_create_instance(&self, ty: &TypeDescriptor) -> bool {
        (**self).can_create_instance(ty)
    }

    fn create_random_value(&mut self, ty: &TypeDescriptor) -> PropertyTestResult<Value> {
        (**self).create_random_value(ty)
    }

    fn begin_run(&mut self) {
        (**self).begin_run()
    }
}
