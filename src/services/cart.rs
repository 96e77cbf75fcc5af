use anyhow::Result;

use crate::assistant::catalog::ResolvedProduct;

/// Корзина. Наличие товара проверяется только по id.
pub trait CartStore {
    /// Добавляет товар. Повторное добавление того же id ничего не меняет.
    fn add(&mut self, product: ResolvedProduct) -> Result<()>;

    fn items(&self) -> &[ResolvedProduct];

    fn contains(&self, id: &str) -> bool {
        self.items().iter().any(|item| item.id() == id)
    }

    fn total(&self) -> f64 {
        self.items().iter().map(|item| item.product.price).sum()
    }

    fn len(&self) -> usize {
        self.items().len()
    }
}

/// Корзина в памяти, живет до закрытия приложения
#[derive(Debug, Default)]
pub struct InMemoryCart {
    items: Vec<ResolvedProduct>,
}

impl InMemoryCart {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStore for InMemoryCart {
    fn add(&mut self, product: ResolvedProduct) -> Result<()> {
        if !self.contains(product.id()) {
            log::info!("🛒 В корзину: {} ({})", product.product.name, product.id());
            self.items.push(product);
        }
        Ok(())
    }

    fn items(&self) -> &[ResolvedProduct] {
        &self.items
    }
}
