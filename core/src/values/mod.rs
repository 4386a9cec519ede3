pub mod coerce;
pub mod dynamic;
pub mod function;
pub mod json;
pub mod regexp;

pub use coerce::{Class, CoercionError, Target, TypePair};
pub use dynamic::{Map, Value};
pub use function::{Function, FunctionError, NativeFn};
pub use regexp::{RegExp, RegExpError};

#[cfg(test)]
mod coerce_test;
#[cfg(test)]
mod dynamic_test;
