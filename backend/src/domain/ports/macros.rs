//! `define_port_error!` generates the `thiserror` enums returned by driven
//! ports, plus one snake_case constructor per variant whose `String` fields
//! accept anything `Into<String>`.

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
    use crate::domain::ports::{
        AccessTokenError, DocumentStoreError, IdentityField, OfficerRepositoryError,
    };

    #[test]
    fn string_fields_accept_str() {
        let err = OfficerRepositoryError::query("relation missing");
        assert_eq!(err.to_string(), "officer repository query failed: relation missing");
    }

    #[test]
    fn typed_fields_are_preserved() {
        let err = OfficerRepositoryError::duplicate(IdentityField::Email);
        assert_eq!(err.to_string(), "officer email already registered");
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(AccessTokenError::expired(), AccessTokenError::Expired);
    }

    #[test]
    fn multi_field_variants_keep_argument_order() {
        let err = DocumentStoreError::write("APP2025000001_previous_id_a.pdf", "disk full");
        assert_eq!(
            err.to_string(),
            "failed to store APP2025000001_previous_id_a.pdf: disk full"
        );
    }
}
