//! Shopping cart state container.
//!
//! The cart is pure local state: nothing here performs I/O, and every
//! derived figure (item count, total) is recomputed from the lines rather
//! than cached. The checkout flow is the only collaborator allowed to clear
//! it, and only after payment verification succeeds.

use rust_decimal::Decimal;

use oakline_core::ProductId;

use crate::models::Product;

/// One cart line: a product reference plus the quantity being purchased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    /// Unit price captured when the line was added.
    pub unit_price: Decimal,
    pub image: Option<String>,
    pub quantity: u32,
}

impl CartLine {
    /// Line subtotal.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// The in-memory shopping cart.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
    open: bool,
}

impl Cart {
    /// An empty, closed cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart drawer is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Open or close the cart drawer.
    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    /// Add one unit of `product`.
    ///
    /// If a line for the product already exists its quantity is incremented;
    /// otherwise a new line is appended at the end.
    pub fn add_item(&mut self, product: &Product) {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product.id)
        {
            line.quantity = line.quantity.saturating_add(1);
            return;
        }
        self.lines.push(CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            image: product.primary_image().map(str::to_string),
            quantity: 1,
        });
    }

    /// Set the quantity of a line.
    ///
    /// A quantity of zero or less removes the line. Updating a product with
    /// no line is a no-op.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| &line.product_id == product_id)
        {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
    }

    /// Remove the line for `product_id`, if present.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        self.lines.retain(|line| &line.product_id != product_id);
    }

    /// Remove every line. Does not touch the open flag.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of line subtotals.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
