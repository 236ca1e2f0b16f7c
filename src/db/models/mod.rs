//! Database Models

// Serde helpers
pub mod serde_helpers;

// Accounts
pub mod user;

// Catalog
pub mod category;
pub mod product;

// Orders
pub mod order;

// Re-exports
pub use user::{Address, User, UserCreate, UserId, UserStatus};
pub use category::{Category, CategoryCreate, CategoryId, CategoryUpdate};
pub use product::{Product, ProductCreate, ProductId, ProductUpdate};
pub use order::{
    Order, OrderCreate, OrderId, OrderItem, OrderItemInput, OrderItemView, OrderProductSummary,
    OrderStatus, OrderStatusUpdate, OrderUserSummary, OrderView, PaymentMethod, ShippingAddress,
};
