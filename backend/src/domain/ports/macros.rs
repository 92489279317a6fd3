//! `define_port_error!`: generates port error enums with `thiserror` messages
//! and snake_case constructors that accept `impl Into<T>` for each field.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        pub enum SampleStoreError {
            Offline => "store offline",
            Rejected { message: String } => "rejected: {message}",
            Slow { timeout_ms: u64 } => "slow: {timeout_ms} ms",
            Partial { message: String, count: u32 } => "partial: {message} ({count})",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(SampleStoreError::offline(), SampleStoreError::Offline);
        assert_eq!(SampleStoreError::offline().to_string(), "store offline");
    }

    #[test]
    fn string_fields_accept_borrowed_text() {
        let err = SampleStoreError::rejected("duplicate key");
        assert_eq!(err.to_string(), "rejected: duplicate key");
    }

    #[test]
    fn numeric_fields_keep_their_type() {
        assert_eq!(SampleStoreError::slow(250_u64).to_string(), "slow: 250 ms");
    }

    #[test]
    fn mixed_fields_are_taken_in_declaration_order() {
        let err = SampleStoreError::partial("users", 3_u32);
        assert_eq!(err.to_string(), "partial: users (3)");
    }
}
