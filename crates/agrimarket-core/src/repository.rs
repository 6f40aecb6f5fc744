//! The marketplace repository.
//!
//! `MarketRepository` is the only component that reads or writes persisted
//! collections. Every operation is a read-modify-write cycle over whole
//! collections: load the JSON value under a key, change it in memory, write it
//! back. Nothing is cached between calls, so concurrent writers see
//! last-write-wins at the collection level.

use std::collections::HashSet;

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::analytics::{DashboardStats, LoginRecord, ViewRecord, VisitorMetadata};
use crate::error::{MarketError, Result};
use crate::farmer::{Farmer, NewFarmer, SecurityQuestion, SessionProjection};
use crate::id::next_id;
use crate::product::{BrowseQuery, NewProduct, Product, ProductDetail, browse_products};
use crate::store::{KeyValueStore, StoreKey};

/// CRUD façade over the farmer, product, session and analytics collections.
///
/// # Example
///
/// ```
/// use agrimarket_core::farmer::{NewFarmer, SecurityQuestion};
/// use agrimarket_core::repository::MarketRepository;
/// use agrimarket_core::store::MemoryStore;
///
/// let repo = MarketRepository::new(MemoryStore::new());
/// let data = NewFarmer::new(
///     "Alice",
///     "9000000001",
///     "alice",
///     "pw123",
///     (SecurityQuestion::Color, "blue"),
///     (SecurityQuestion::Pet, "tom"),
/// );
/// repo.register_farmer(data).unwrap();
/// let farmer = repo.login("alice", "pw123").unwrap();
/// assert_eq!(repo.current_session().unwrap().unwrap().id, farmer.id);
/// ```
pub struct MarketRepository<S> {
    store: S,
}

impl<S: KeyValueStore> MarketRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ============================================================================
    // Store boundary
    // ============================================================================

    /// Loads and parses the value under `key`.
    ///
    /// An absent key or an empty string is `None`; an unparsable value is
    /// `CorruptState`.
    fn load<T: DeserializeOwned>(&self, key: StoreKey) -> Result<Option<T>> {
        let raw = match self.store.get(key.as_str())? {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(None),
        };

        serde_json::from_str(&raw).map(Some).map_err(|e| {
            warn!(key = %key, error = %e, "Stored value is not valid");
            MarketError::corrupt(key.as_str(), e.to_string())
        })
    }

    fn load_list<T: DeserializeOwned>(&self, key: StoreKey) -> Result<Vec<T>> {
        Ok(self.load(key)?.unwrap_or_default())
    }

    fn save<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key.as_str(), &raw)
    }

    // ============================================================================
    // Farmers
    // ============================================================================

    /// All farmers in registration order.
    pub fn list_farmers(&self) -> Result<Vec<Farmer>> {
        self.load_list(StoreKey::Farmers)
    }

    /// Registers a new farmer.
    ///
    /// Username uniqueness is checked before mobile uniqueness.
    pub fn register_farmer(&self, data: NewFarmer) -> Result<Farmer> {
        let mut farmers = self.list_farmers()?;

        if farmers.iter().any(|f| f.username == data.username) {
            return Err(MarketError::DuplicateUsername);
        }
        if farmers.iter().any(|f| f.mobile == data.mobile) {
            return Err(MarketError::DuplicateMobile);
        }

        let now = Utc::now();
        let id = next_id(farmers.iter().map(|f| f.id.as_str()), now);
        let farmer = Farmer::from_registration(id, data, now);

        farmers.push(farmer.clone());
        self.save(StoreKey::Farmers, &farmers)?;

        info!(farmer_id = %farmer.id, username = %farmer.username, "Registered farmer");
        Ok(farmer)
    }

    fn find_by_username(&self, username: &str) -> Result<Option<Farmer>> {
        Ok(self
            .list_farmers()?
            .into_iter()
            .find(|f| f.username == username))
    }

    // ============================================================================
    // Session
    // ============================================================================

    /// Authenticates a farmer and replaces the current session.
    pub fn login(&self, username: &str, password: &str) -> Result<Farmer> {
        let farmer = self
            .list_farmers()?
            .into_iter()
            .find(|f| f.username == username && f.password == password)
            .ok_or_else(|| {
                debug!(username, "Login rejected");
                MarketError::InvalidCredentials
            })?;

        self.save(StoreKey::CurrentFarmer, &SessionProjection::from(&farmer))?;

        info!(farmer_id = %farmer.id, "Farmer logged in");
        Ok(farmer)
    }

    /// The logged-in farmer's projection, if any.
    pub fn current_session(&self) -> Result<Option<SessionProjection>> {
        self.load(StoreKey::CurrentFarmer)
    }

    /// Ends the current session. No-op when nobody is logged in.
    pub fn logout(&self) -> Result<()> {
        self.store.remove(StoreKey::CurrentFarmer.as_str())?;
        debug!("Session cleared");
        Ok(())
    }

    // ============================================================================
    // Password recovery
    // ============================================================================

    /// The two questions a farmer picked at registration.
    pub fn security_questions(
        &self,
        username: &str,
    ) -> Result<(SecurityQuestion, SecurityQuestion)> {
        let farmer = self
            .find_by_username(username)?
            .ok_or(MarketError::UsernameNotFound)?;
        Ok((farmer.security_q1, farmer.security_q2))
    }

    /// Checks both security answers, ignoring case.
    pub fn verify_security_answers(&self, username: &str, a1: &str, a2: &str) -> Result<Farmer> {
        let farmer = self
            .find_by_username(username)?
            .ok_or(MarketError::UsernameNotFound)?;

        if !farmer.answers_match(a1, a2) {
            debug!(username, "Security answers rejected");
            return Err(MarketError::SecurityMismatch);
        }
        Ok(farmer)
    }

    /// Overwrites a farmer's password in place.
    pub fn reset_password(&self, username: &str, new_password: &str) -> Result<()> {
        let mut farmers = self.list_farmers()?;
        let farmer = farmers
            .iter_mut()
            .find(|f| f.username == username)
            .ok_or(MarketError::FarmerNotFound)?;

        farmer.password = new_password.to_string();
        self.save(StoreKey::Farmers, &farmers)?;

        info!(username, "Password reset");
        Ok(())
    }

    /// Verifies the answers, then resets the password.
    pub fn recover_password(
        &self,
        username: &str,
        a1: &str,
        a2: &str,
        new_password: &str,
    ) -> Result<()> {
        self.verify_security_answers(username, a1, a2)?;
        self.reset_password(username, new_password)
    }

    // ============================================================================
    // Products
    // ============================================================================

    /// All products in listing order.
    pub fn list_products(&self) -> Result<Vec<Product>> {
        self.load_list(StoreKey::Products)
    }

    /// Products owned by `farmer_id`, in listing order.
    pub fn list_farmer_products(&self, farmer_id: &str) -> Result<Vec<Product>> {
        Ok(self
            .list_products()?
            .into_iter()
            .filter(|p| p.farmer_id == farmer_id)
            .collect())
    }

    pub fn product(&self, product_id: &str) -> Result<Option<Product>> {
        Ok(self
            .list_products()?
            .into_iter()
            .find(|p| p.id == product_id))
    }

    /// Lists a new product for `farmer_id`.
    pub fn add_product(&self, farmer_id: &str, data: NewProduct) -> Result<Product> {
        let mut products = self.list_products()?;

        let now = Utc::now();
        let id = next_id(products.iter().map(|p| p.id.as_str()), now);
        let product = Product::from_listing(id, farmer_id, data, now);

        products.push(product.clone());
        self.save(StoreKey::Products, &products)?;

        info!(product_id = %product.id, farmer_id, "Listed product");
        Ok(product)
    }

    /// Removes a product if both id and owner match; otherwise does nothing.
    pub fn delete_product(&self, product_id: &str, farmer_id: &str) -> Result<()> {
        let products = self.list_products()?;
        let before = products.len();
        let kept: Vec<Product> = products
            .into_iter()
            .filter(|p| !(p.id == product_id && p.farmer_id == farmer_id))
            .collect();

        if kept.len() == before {
            debug!(product_id, farmer_id, "Nothing to delete");
            return Ok(());
        }
        self.save(StoreKey::Products, &kept)?;
        info!(product_id, farmer_id, "Deleted product");
        Ok(())
    }

    fn bump_counter(&self, product_id: &str, counter: impl FnOnce(&mut Product)) -> Result<()> {
        let mut products = self.list_products()?;
        match products.iter_mut().find(|p| p.id == product_id) {
            Some(product) => {
                counter(product);
                self.save(StoreKey::Products, &products)
            }
            None => {
                debug!(product_id, "Counter update for unknown product ignored");
                Ok(())
            }
        }
    }

    /// Adds one view to a product. No-op for unknown products.
    pub fn increment_views(&self, product_id: &str) -> Result<()> {
        self.bump_counter(product_id, |p| p.views = p.views.saturating_add(1))
    }

    /// Adds one inquiry to a product. No-op for unknown products.
    pub fn increment_inquiries(&self, product_id: &str) -> Result<()> {
        self.bump_counter(product_id, |p| p.inquiries = p.inquiries.saturating_add(1))
    }

    /// The farmer who listed `product_id`, if both exist.
    pub fn farmer_for_product(&self, product_id: &str) -> Result<Option<Farmer>> {
        let Some(product) = self.product(product_id)? else {
            return Ok(None);
        };
        Ok(self
            .list_farmers()?
            .into_iter()
            .find(|f| f.id == product.farmer_id))
    }

    /// Filters and sorts the catalogue for buyers.
    pub fn browse(&self, query: &BrowseQuery) -> Result<Vec<Product>> {
        Ok(browse_products(self.list_products()?, query))
    }

    /// Buyer opens a product: records the view, counts it, returns the detail.
    ///
    /// The view is recorded even when the product or its farmer is missing.
    pub fn open_product(
        &self,
        product_id: &str,
        metadata: VisitorMetadata,
    ) -> Result<Option<ProductDetail>> {
        self.record_view(product_id, metadata)?;
        self.increment_views(product_id)?;

        let Some(product) = self.product(product_id)? else {
            return Ok(None);
        };
        let Some(farmer) = self.farmer_for_product(product_id)? else {
            return Ok(None);
        };
        Ok(Some(ProductDetail { product, farmer }))
    }

    /// Buyer asks for the farmer's contact: counts an inquiry, returns the farmer.
    pub fn contact_farmer(&self, product_id: &str) -> Result<Option<Farmer>> {
        self.increment_inquiries(product_id)?;
        self.farmer_for_product(product_id)
    }

    // ============================================================================
    // Analytics
    // ============================================================================

    pub fn list_views(&self) -> Result<Vec<ViewRecord>> {
        self.load_list(StoreKey::ProductViews)
    }

    /// Appends a view record. Does not touch the product's view counter.
    pub fn record_view(&self, product_id: &str, metadata: VisitorMetadata) -> Result<ViewRecord> {
        let mut views = self.list_views()?;

        let now = Utc::now();
        let record = ViewRecord {
            id: next_id(views.iter().map(|v| v.id.as_str()), now),
            product_id: product_id.to_string(),
            metadata,
            viewed_at: now,
        };

        views.push(record.clone());
        self.save(StoreKey::ProductViews, &views)?;

        debug!(product_id, viewer = %record.metadata.viewer_id(), "Recorded view");
        Ok(record)
    }

    pub fn list_login_history(&self) -> Result<Vec<LoginRecord>> {
        self.load_list(StoreKey::LoginHistory)
    }

    /// Login records of one farmer, oldest first.
    pub fn login_history(&self, farmer_id: &str) -> Result<Vec<LoginRecord>> {
        Ok(self
            .list_login_history()?
            .into_iter()
            .filter(|r| r.farmer_id == farmer_id)
            .collect())
    }

    /// Appends a login record.
    pub fn record_login(&self, farmer_id: &str, metadata: VisitorMetadata) -> Result<LoginRecord> {
        let mut history = self.list_login_history()?;

        let now = Utc::now();
        let record = LoginRecord {
            id: next_id(history.iter().map(|r| r.id.as_str()), now),
            farmer_id: farmer_id.to_string(),
            metadata,
            login_time: now,
        };

        history.push(record.clone());
        self.save(StoreKey::LoginHistory, &history)?;

        debug!(farmer_id, "Recorded login");
        Ok(record)
    }

    /// Number of distinct viewers across all of a farmer's products.
    pub fn unique_viewer_count(&self, farmer_id: &str) -> Result<usize> {
        let products = self.list_farmer_products(farmer_id)?;
        self.count_unique_viewers(&products)
    }

    fn count_unique_viewers(&self, products: &[Product]) -> Result<usize> {
        let product_ids: HashSet<&str> = products.iter().map(|p| p.id.as_str()).collect();
        let views = self.list_views()?;
        let viewers: HashSet<&str> = views
            .iter()
            .filter(|v| product_ids.contains(v.product_id.as_str()))
            .map(|v| v.metadata.viewer_id())
            .collect();
        Ok(viewers.len())
    }

    /// Totals for a farmer's dashboard.
    pub fn dashboard_stats(&self, farmer_id: &str) -> Result<DashboardStats> {
        let products = self.list_farmer_products(farmer_id)?;
        Ok(DashboardStats {
            total_products: products.len(),
            total_views: products.iter().map(|p| p.views).sum(),
            total_inquiries: products.iter().map(|p| p.inquiries).sum(),
            unique_viewers: self.count_unique_viewers(&products)?,
        })
    }
}
