use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<u64>().map($name).map_err(|e| {
                    ErrorKind::ParseError(format!("invalid {} {s:?}: {e}", stringify!($name))).into()
                })
            }
        }
    };
}

id_type!(
    /// Course primary key, carried in `data-id` / `data-course-id`.
    CourseId
);
id_type!(
    /// Cart row primary key, distinct from the course it holds.
    CartItemId
);

/// A cart row as rendered by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartRow {
    pub id: CartItemId,
    pub course_id: CourseId,
    pub name: String,
    pub price: f64,
    /// Outer markup, kept so an undo can put the row back verbatim.
    pub markup: String,
}

/// Snapshot held by the undo buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemovedItem {
    pub cart_id: CartItemId,
    pub course_id: CourseId,
    pub markup: String,
    pub name: String,
}

impl From<CartRow> for RemovedItem {
    fn from(row: CartRow) -> Self {
        RemovedItem {
            cart_id: row.id,
            course_id: row.course_id,
            markup: row.markup,
            name: row.name,
        }
    }
}

/// Heart icon state on a wishlist button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FavoriteIcon {
    #[default]
    Regular,
    Solid,
}

impl FavoriteIcon {
    pub fn classes_to_add(self) -> &'static [&'static str] {
        match self {
            FavoriteIcon::Regular => &["fa-regular"],
            FavoriteIcon::Solid => &["fa-solid", "text-danger"],
        }
    }

    pub fn classes_to_remove(self) -> &'static [&'static str] {
        match self {
            FavoriteIcon::Regular => &["fa-solid", "text-danger"],
            FavoriteIcon::Solid => &["fa-regular"],
        }
    }
}

/// Label on an add-to-cart button after the server answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartButtonLabel {
    Added,
    AlreadyInCart,
}

impl CartButtonLabel {
    pub fn text(self) -> &'static str {
        match self {
            CartButtonLabel::Added => "Added to Cart",
            CartButtonLabel::AlreadyInCart => "Already in Cart",
        }
    }
}
