//! Bakehouse Cart - the storefront's shopping cart subsystem.
//!
//! The cart is a small, persisted collection of cakes with derived totals.
//! It is owned by a single [`CartStore`] that the application shell builds
//! and passes around by reference; nothing here is global.
//!
//! # Modules
//!
//! - [`product`] - Catalog product descriptors and their validation
//! - [`item`] - Cart line items
//! - [`storage`] - Durable key-value backends (memory, file)
//! - [`persist`] - Versioned snapshot format and load/save
//! - [`store`] - The cart store itself
//! - [`view`] - Display-ready cart views
//! - [`checkout`] - Delivery details, order payload assembly, order placement
//! - [`order_api`] - Order API client
//! - [`payment`] - UPI payment links and QR codes
//!
//! # Example
//!
//! ```rust
//! use bakehouse_cart::{CartStore, MemoryStorage, ProductDescriptor};
//!
//! let mut cart = CartStore::open(MemoryStorage::new());
//! let cake = ProductDescriptor::new("c1", "Choc", 85, "x.jpg").validate()?;
//! cart.add_item(&cake);
//! cart.add_item(&cake);
//!
//! assert_eq!(cart.total_items(), 2);
//! assert_eq!(cart.total_price().to_string(), "170");
//! # Ok::<(), bakehouse_cart::ProductError>(())
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod item;
pub mod order_api;
pub mod payment;
pub mod persist;
pub mod product;
pub mod storage;
pub mod store;
pub mod view;

pub use checkout::{CheckoutError, DeliveryDetails, DeliveryError, OrderItemPayload, OrderPayload};
pub use item::CartLineItem;
pub use order_api::{HttpOrderApi, OrderApi, OrderApiError, OrderConfirmation, OrderSummary};
pub use payment::UpiPayee;
pub use product::{MAX_UNIT_PRICE, PriceInput, ProductDescriptor, ProductError, ValidProduct};
pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageError};
pub use store::CartStore;
pub use view::{CartItemView, CartView};
