//! Common type definitions and newtype wrappers for domain modeling.

use crate::error::{Result, TweetalyticsError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static HANDLE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]{1,50}$").expect("Invalid handle regex pattern"));

/// A user handle (screen name) on the social-graph provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

impl Handle {
    /// Validates and wraps a handle.
    pub fn new(handle: impl Into<String>) -> Result<Self> {
        let handle = handle.into();
        if HANDLE_REGEX.is_match(&handle) {
            Ok(Self(handle))
        } else {
            Err(TweetalyticsError::validation_field(
                format!("Invalid screen name: {handle:?}"),
                "id",
            ))
        }
    }

    /// Returns the handle as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Handle {
    type Error = TweetalyticsError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Handle> for String {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl FromStr for Handle {
    type Err = TweetalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// Declares a closed string enumeration with lowercase wire names,
/// a `FromStr` that reports a validation error, and `Display`.
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire $(, alias = $alias)*)]
                $variant,
            )+
        }

        impl $name {
            /// Every recognized value, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The canonical wire name.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = TweetalyticsError;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($wire $(| $alias)* => Ok($name::$variant),)+
                    other => Err(TweetalyticsError::validation_field(
                        format!("Invalid {}: {other:?}", $field),
                        $field,
                    )),
                }
            }
        }
    };
}

closed_enum! {
    /// Which connection list to fetch for a handle.
    ConnectionKind, field = "kind" {
        /// Accounts following the handle.
        Followers => "followers",
        /// Accounts the handle follows.
        Friends => "friends",
    }
}

closed_enum! {
    /// Numeric attribute used as the ranking key.
    Metric, field = "metric" {
        /// Follower count of the connected account.
        Followers => "followers",
        /// Friend count of the connected account.
        Friends => "friends",
        /// Status count of the connected account.
        Statuses => "statuses",
    }
}

impl Metric {
    /// Name of the record attribute holding this metric's counter.
    pub const fn attribute(self) -> &'static str {
        match self {
            Self::Followers => "followers_count",
            Self::Friends => "friends_count",
            Self::Statuses => "statuses_count",
        }
    }
}

closed_enum! {
    /// Which extreme of the sorted distribution to keep.
    Category, field = "category" {
        /// Largest values.
        Top => "top",
        /// Smallest values.
        Bottom => "bottom",
    }
}

impl Category {
    /// The display order this category yields without an explicit override.
    pub const fn natural_order(self) -> Order {
        match self {
            Self::Top => Order::Descending,
            Self::Bottom => Order::Ascending,
        }
    }
}

closed_enum! {
    /// Display direction of a selected subset.
    Order, field = "order" {
        /// Smallest first.
        Ascending => "ascending" | "asc",
        /// Largest first.
        Descending => "descending" | "desc",
    }
}

closed_enum! {
    /// Chart styles a renderer can be asked for.
    ChartKind, field = "chart" {
        /// Vertical grouped bars.
        Bar => "bar",
        /// Flat pie.
        Pie => "pie",
        /// Pie with a 3D tilt.
        Pie3d => "pie3d" | "pie-3d",
    }
}

impl ChartKind {
    /// Whether this kind is drawn as a pie.
    pub const fn is_pie(self) -> bool {
        matches!(self, Self::Pie | Self::Pie3d)
    }
}

/// Chart canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasSize {
    /// Parses a `WIDTHxHEIGHT` specification and checks its area against
    /// `max_pixels`.
    pub fn parse(spec: &str, max_pixels: u64) -> Result<Self> {
        let dims: Vec<&str> = spec.trim().split('x').collect();
        let [width, height] = dims.as_slice() else {
            return Err(TweetalyticsError::validation_field(
                format!("Canvas size must look like WIDTHxHEIGHT, got {spec:?}"),
                "size",
            ));
        };

        let parse_dim = |raw: &str| {
            raw.parse::<u32>()
                .ok()
                .filter(|v| *v > 0)
                .ok_or_else(|| {
                    TweetalyticsError::validation_field(
                        format!("Canvas dimension must be a positive integer, got {raw:?}"),
                        "size",
                    )
                })
        };
        let size = Self {
            width: parse_dim(*width)?,
            height: parse_dim(*height)?,
        };

        if size.area() > max_pixels {
            return Err(TweetalyticsError::validation_field(
                format!(
                    "Canvas {size} covers {} pixels, more than the {max_pixels} allowed",
                    size.area()
                ),
                "size",
            ));
        }
        Ok(size)
    }

    /// Number of pixels covered.
    pub const fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
