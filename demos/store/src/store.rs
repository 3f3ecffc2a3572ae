//! An in-memory product store, passed explicitly to every view that needs
//! it.

use std::collections::HashSet;
use std::sync::RwLock;

use serde_json::Value;

use cruditor_core::{CruditorError, CruditorResult};

use crate::models::Product;

/// The backing store for the demo's products.
///
/// Deletion is blocked for products referenced by open orders, mirroring a
/// protected foreign key.
pub struct ProductStore {
    products: RwLock<Vec<Product>>,
    ordered: RwLock<HashSet<i64>>,
    next_pk: RwLock<i64>,
}

impl ProductStore {
    /// Creates a store seeded with a few products; the first one is
    /// referenced by an open order.
    pub fn with_sample_data() -> Self {
        let products = vec![
            Product {
                pk: 1,
                name: "Espresso Cup".to_string(),
                price_cents: 1250,
                active: true,
            },
            Product {
                pk: 2,
                name: "Moka Pot".to_string(),
                price_cents: 3490,
                active: true,
            },
            Product {
                pk: 3,
                name: "Hand Grinder".to_string(),
                price_cents: 7900,
                active: false,
            },
        ];
        let mut ordered = HashSet::new();
        ordered.insert(1);

        Self {
            products: RwLock::new(products),
            ordered: RwLock::new(ordered),
            next_pk: RwLock::new(4),
        }
    }

    /// Returns all products as rows.
    pub fn all(&self) -> Vec<Value> {
        self.products
            .read()
            .expect("product store lock poisoned")
            .iter()
            .map(Product::to_row)
            .collect()
    }

    /// Looks a product up by primary key.
    pub fn get(&self, pk: i64) -> CruditorResult<Value> {
        self.products
            .read()
            .expect("product store lock poisoned")
            .iter()
            .find(|p| p.pk == pk)
            .map(Product::to_row)
            .ok_or_else(|| CruditorError::DoesNotExist(format!("product {pk}")))
    }

    /// Inserts a new product and returns its row.
    pub fn insert(&self, name: String, price_cents: i64, active: bool) -> Value {
        let mut next_pk = self.next_pk.write().expect("product store lock poisoned");
        let product = Product {
            pk: *next_pk,
            name,
            price_cents,
            active,
        };
        *next_pk += 1;
        let row = product.to_row();
        self.products
            .write()
            .expect("product store lock poisoned")
            .push(product);
        row
    }

    /// Updates an existing product and returns its row.
    pub fn update(
        &self,
        pk: i64,
        name: String,
        price_cents: i64,
        active: bool,
    ) -> CruditorResult<Value> {
        let mut products = self.products.write().expect("product store lock poisoned");
        let product = products
            .iter_mut()
            .find(|p| p.pk == pk)
            .ok_or_else(|| CruditorError::DoesNotExist(format!("product {pk}")))?;
        product.name = name;
        product.price_cents = price_cents;
        product.active = active;
        Ok(product.to_row())
    }

    /// Deletes a product.
    ///
    /// # Errors
    ///
    /// Returns [`CruditorError::ProtectedRelation`] when an open order still
    /// references the product.
    pub fn delete(&self, pk: i64) -> CruditorResult<()> {
        if self
            .ordered
            .read()
            .expect("product store lock poisoned")
            .contains(&pk)
        {
            return Err(CruditorError::ProtectedRelation(vec![format!(
                "order: open order for product {pk}"
            )]));
        }

        let mut products = self.products.write().expect("product store lock poisoned");
        let before = products.len();
        products.retain(|p| p.pk != pk);
        if products.len() == before {
            return Err(CruditorError::DoesNotExist(format!("product {pk}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_data() {
        let store = ProductStore::with_sample_data();
        assert_eq!(store.all().len(), 3);
    }

    #[test]
    fn test_insert_assigns_pk() {
        let store = ProductStore::with_sample_data();
        let row = store.insert("Kettle".to_string(), 5900, true);
        assert_eq!(row["pk"], 4);
        assert_eq!(store.all().len(), 4);
    }

    #[test]
    fn test_update() {
        let store = ProductStore::with_sample_data();
        let row = store.update(2, "Moka Pot XL".to_string(), 3990, true).unwrap();
        assert_eq!(row["name"], "Moka Pot XL");
        assert!(store.update(99, "x".to_string(), 1, true).is_err());
    }

    #[test]
    fn test_delete_protected() {
        let store = ProductStore::with_sample_data();
        match store.delete(1) {
            Err(CruditorError::ProtectedRelation(objects)) => {
                assert_eq!(objects.len(), 1);
            }
            other => panic!("expected protected relation, got {other:?}"),
        }
        assert!(store.delete(2).is_ok());
        assert!(store.delete(99).is_err());
    }
}
