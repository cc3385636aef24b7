//! # Domain Types
//!
//! Raw materials, products, and worker roles, plus the fixed-size tables
//! that key data by them. Recipes and role↔product mappings live here so
//! every actor agrees on who produces what from what.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// A base ingredient kind consumed by chef recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RawMaterial {
    Wheat,
    Yeast,
    Butter,
    Milk,
    SugarSalt,
    SweetItems,
    CheeseSalami,
}

impl RawMaterial {
    pub const COUNT: usize = 7;
    pub const ALL: [RawMaterial; Self::COUNT] = [
        RawMaterial::Wheat,
        RawMaterial::Yeast,
        RawMaterial::Butter,
        RawMaterial::Milk,
        RawMaterial::SugarSalt,
        RawMaterial::SweetItems,
        RawMaterial::CheeseSalami,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RawMaterial::Wheat => "wheat",
            RawMaterial::Yeast => "yeast",
            RawMaterial::Butter => "butter",
            RawMaterial::Milk => "milk",
            RawMaterial::SugarSalt => "sugar-salt",
            RawMaterial::SweetItems => "sweet-items",
            RawMaterial::CheeseSalami => "cheese-salami",
        }
    }
}

impl fmt::Display for RawMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A sellable or intermediate good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Product {
    Bread,
    Sandwich,
    Cake,
    Sweet,
    SweetPatisserie,
    SavoryPatisserie,
    Paste,
}

impl Product {
    pub const COUNT: usize = 7;
    pub const ALL: [Product; Self::COUNT] = [
        Product::Bread,
        Product::Sandwich,
        Product::Cake,
        Product::Sweet,
        Product::SweetPatisserie,
        Product::SavoryPatisserie,
        Product::Paste,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Product::Bread => "bread",
            Product::Sandwich => "sandwich",
            Product::Cake => "cake",
            Product::Sweet => "sweet",
            Product::SweetPatisserie => "sweet-patisserie",
            Product::SavoryPatisserie => "savory-patisserie",
            Product::Paste => "paste",
        }
    }

    /// The chef role that produces this good, if any (bread is baker-only).
    pub fn chef_role(self) -> Option<ChefRole> {
        match self {
            Product::Bread => None,
            Product::Sandwich => Some(ChefRole::Sandwich),
            Product::Cake => Some(ChefRole::Cake),
            Product::Sweet => Some(ChefRole::Sweet),
            Product::SweetPatisserie => Some(ChefRole::SweetPatisserie),
            Product::SavoryPatisserie => Some(ChefRole::SavoryPatisserie),
            Product::Paste => Some(ChefRole::Paste),
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A chef specialization: one product, one fixed recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChefRole {
    Paste,
    Cake,
    Sandwich,
    Sweet,
    SweetPatisserie,
    SavoryPatisserie,
}

impl ChefRole {
    pub const COUNT: usize = 6;
    pub const ALL: [ChefRole; Self::COUNT] = [
        ChefRole::Paste,
        ChefRole::Cake,
        ChefRole::Sandwich,
        ChefRole::Sweet,
        ChefRole::SweetPatisserie,
        ChefRole::SavoryPatisserie,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChefRole::Paste => "paste-chef",
            ChefRole::Cake => "cake-chef",
            ChefRole::Sandwich => "sandwich-chef",
            ChefRole::Sweet => "sweet-chef",
            ChefRole::SweetPatisserie => "sweet-patisserie-chef",
            ChefRole::SavoryPatisserie => "savory-patisserie-chef",
        }
    }

    /// The product this role turns ingredients into.
    pub fn product(self) -> Product {
        match self {
            ChefRole::Paste => Product::Paste,
            ChefRole::Cake => Product::Cake,
            ChefRole::Sandwich => Product::Sandwich,
            ChefRole::Sweet => Product::Sweet,
            ChefRole::SweetPatisserie => Product::SweetPatisserie,
            ChefRole::SavoryPatisserie => Product::SavoryPatisserie,
        }
    }

    /// Minimum raw-material quantities required for one unit.
    pub fn recipe(self) -> &'static [(RawMaterial, u32)] {
        match self {
            ChefRole::Paste => &[
                (RawMaterial::Wheat, 2),
                (RawMaterial::Yeast, 1),
                (RawMaterial::Butter, 1),
                (RawMaterial::Milk, 1),
            ],
            ChefRole::Cake => &[
                (RawMaterial::Wheat, 3),
                (RawMaterial::Butter, 2),
                (RawMaterial::Milk, 2),
                (RawMaterial::SugarSalt, 2),
                (RawMaterial::SweetItems, 2),
            ],
            ChefRole::Sandwich => &[(RawMaterial::CheeseSalami, 2)],
            ChefRole::Sweet => &[(RawMaterial::SugarSalt, 2), (RawMaterial::SweetItems, 3)],
            ChefRole::SweetPatisserie => {
                &[(RawMaterial::SweetItems, 2), (RawMaterial::SugarSalt, 1)]
            }
            ChefRole::SavoryPatisserie => {
                &[(RawMaterial::CheeseSalami, 1), (RawMaterial::Butter, 1)]
            }
        }
    }

    /// The two patisserie roles also consume one unit of finished paste.
    pub fn needs_paste(self) -> bool {
        matches!(self, ChefRole::SweetPatisserie | ChefRole::SavoryPatisserie)
    }
}

impl fmt::Display for ChefRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A baker specialization: a fixed set of owned product types, capacity-capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BakerRole {
    CakeSweet,
    Patisserie,
    Bread,
}

impl BakerRole {
    pub const COUNT: usize = 3;
    pub const ALL: [BakerRole; Self::COUNT] = [
        BakerRole::CakeSweet,
        BakerRole::Patisserie,
        BakerRole::Bread,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BakerRole::CakeSweet => "cake-sweet-baker",
            BakerRole::Patisserie => "patisserie-baker",
            BakerRole::Bread => "bread-baker",
        }
    }

    /// Product types this role owns, in preference order.
    pub fn products(self) -> &'static [Product] {
        match self {
            BakerRole::CakeSweet => &[Product::Cake, Product::Sweet],
            BakerRole::Patisserie => &[Product::SweetPatisserie, Product::SavoryPatisserie],
            BakerRole::Bread => &[Product::Bread, Product::Sandwich],
        }
    }

    /// Whether the role fills every owned type per pass (bread baker also
    /// assembles sandwiches) or stops at the first type under capacity.
    pub fn fills_all_owned(self) -> bool {
        matches!(self, BakerRole::Bread)
    }
}

impl fmt::Display for BakerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

macro_rules! keyed_table {
    ($(#[$doc:meta])* $table:ident, $key:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $table<T>(pub [T; <$key>::COUNT]);

        impl<T> $table<T> {
            /// Builds a table by evaluating `fill` for every key.
            pub fn build(fill: impl FnMut($key) -> T) -> Self {
                Self(<$key>::ALL.map(fill))
            }

            /// Iterates entries in key order.
            pub fn iter(&self) -> impl Iterator<Item = ($key, &T)> {
                <$key>::ALL.iter().copied().zip(self.0.iter())
            }
        }

        impl<T: Default + Copy> Default for $table<T> {
            fn default() -> Self {
                Self([T::default(); <$key>::COUNT])
            }
        }

        impl<T> Index<$key> for $table<T> {
            type Output = T;

            fn index(&self, key: $key) -> &T {
                &self.0[key as usize]
            }
        }

        impl<T> IndexMut<$key> for $table<T> {
            fn index_mut(&mut self, key: $key) -> &mut T {
                &mut self.0[key as usize]
            }
        }
    };
}

keyed_table!(
    /// Per-raw-material table.
    MaterialTable,
    RawMaterial
);
keyed_table!(
    /// Per-product table.
    ProductTable,
    Product
);
keyed_table!(
    /// Per-chef-role table.
    ChefTable,
    ChefRole
);
keyed_table!(
    /// Per-baker-role table.
    BakerTable,
    BakerRole
);
