//! Static categorical encoders
//!
//! Every category class is a closed enum whose variants map to fixed codes
//! starting at 0. Labels that are not part of the enumeration parse into the
//! `Unknown` arm, which shares code 0 with the first enumerated literal. That
//! collision is part of the feature contract trained models depend on, so
//! callers cannot tell "unknown" apart from the first category by code alone.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Common interface of the static category enumerations.
pub trait CategoryCode: Sized + Copy + 'static {
    /// Every known variant in code order.
    const KNOWN: &'static [Self];

    /// Integer code used in the feature vector.
    fn code(self) -> u32;

    /// Dataset label of the variant.
    fn label(self) -> &'static str;

    /// Parse a dataset label. Unrecognized labels map to the unknown arm.
    fn from_label(label: &str) -> Self;
}

macro_rules! category_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => ($label:literal, $code:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            /// Label outside the enumeration; encodes as 0.
            Unknown,
        }

        impl CategoryCode for $name {
            const KNOWN: &'static [Self] = &[$(Self::$variant),+];

            fn code(self) -> u32 {
                match self {
                    $(Self::$variant => $code,)+
                    Self::Unknown => 0,
                }
            }

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                    Self::Unknown => "unknown",
                }
            }

            fn from_label(label: &str) -> Self {
                match label {
                    $($label => Self::$variant,)+
                    _ => Self::Unknown,
                }
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::from_label(s))
            }
        }

        impl From<String> for $name {
            fn from(label: String) -> Self {
                Self::from_label(&label)
            }
        }

        impl From<&str> for $name {
            fn from(label: &str) -> Self {
                Self::from_label(label)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.label().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

category_enum! {
    /// Operating carrier
    Carrier {
        SpiceJet => ("SpiceJet", 0),
        AirAsia => ("AirAsia", 1),
        Vistara => ("Vistara", 2),
        GoFirst => ("GO_FIRST", 3),
        Indigo => ("Indigo", 4),
        AirIndia => ("Air_India", 5),
    }
}

category_enum! {
    /// Coarse number of layovers
    StopBucket {
        Zero => ("zero", 0),
        One => ("one", 1),
        TwoOrMore => ("two_or_more", 2),
    }
}

category_enum! {
    /// Cabin class
    CabinClass {
        Economy => ("Economy", 0),
        Business => ("Business", 1),
    }
}

category_enum! {
    /// Named period of the day, used for both departure and arrival
    TimeBucket {
        EarlyMorning => ("Early_Morning", 0),
        Morning => ("Morning", 1),
        Afternoon => ("Afternoon", 2),
        Evening => ("Evening", 3),
        Night => ("Night", 4),
    }
}

/// Category classes understood by [`encode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryClass {
    Carrier,
    StopBucket,
    CabinClass,
    TimeBucket,
}

/// Encode a raw label of the given class. Unrecognized labels yield 0.
pub fn encode(class: CategoryClass, value: &str) -> u32 {
    match class {
        CategoryClass::Carrier => Carrier::from_label(value).code(),
        CategoryClass::StopBucket => StopBucket::from_label(value).code(),
        CategoryClass::CabinClass => CabinClass::from_label(value).code(),
        CategoryClass::TimeBucket => TimeBucket::from_label(value).code(),
    }
}
