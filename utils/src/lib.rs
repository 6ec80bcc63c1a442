pub mod time;

/// Name of a type as a `&'static str`, for log prefixes
#[macro_export]
macro_rules! struct_name {
    ($t:ty) => {
        stringify!($t)
    };
}
