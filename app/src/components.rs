//! Reusable UI pieces shared by the pages.

pub mod cards;
pub mod error_template;
pub mod header;
pub mod icons;
pub mod loader;
pub mod multi_select;
pub mod pagination;
