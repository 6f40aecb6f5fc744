//! Product domain models, icon derivation and buyer browsing.

pub mod browse;
mod icon;
mod model;

pub use browse::{BrowseQuery, SortOrder, browse_products};
pub use icon::{DEFAULT_PRODUCT_ICON, product_icon};
pub use model::{NewProduct, Product, ProductDetail};
