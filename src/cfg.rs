#[doc(hidden)]
#[macro_export]
macro_rules! cfg_serde {
    ($($item:item)*) => {
        $( #[cfg(feature = "serde")] $item )*
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! cfg_env_filter {
    ($($item:item)*) => {
        $( #[cfg(feature = "env-filter")] $item )*
    }
}
