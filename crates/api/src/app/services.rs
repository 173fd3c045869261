//! Service wiring: one reservation engine, account service and order service
//! over the configured storage. Order placement talks to the in-process
//! account service and engine unless a remote URL is configured for either.

use std::sync::Arc;

use storefront_accounts::{AccountService, AccountStore, InMemoryAccountStore};
use storefront_core::StoreError;
use storefront_infra::PostgresStores;
use storefront_inventory::{
    CatalogQuery, InMemoryProductStore, ProductStore, ReservationEngine, ReservationLockRegistry,
};
use storefront_orders::{AccountDirectory, InMemoryOrderStore, ItemReservations, OrderService, OrderStore};

use crate::config::{CollaboratorConfig, StorageConfig};
use crate::remote::{HttpAccountDirectory, HttpItemReservations};

pub type DynProductStore = Arc<dyn ProductStore>;
pub type DynAccountStore = Arc<dyn AccountStore>;
pub type DynOrderStore = Arc<dyn OrderStore>;

pub type Engine = ReservationEngine<DynProductStore>;
pub type Accounts = AccountService<DynAccountStore>;
pub type DynAccountDirectory = Arc<dyn AccountDirectory>;
pub type DynItemReservations = Arc<dyn ItemReservations>;
pub type Orders = OrderService<DynAccountDirectory, DynItemReservations, DynOrderStore>;

/// Remote replacements for order placement's in-process collaborators.
#[derive(Clone, Default)]
pub struct RemoteCollaborators {
    pub accounts: Option<DynAccountDirectory>,
    pub reservations: Option<DynItemReservations>,
}

impl RemoteCollaborators {
    /// HTTP clients for every configured URL; empty when none is set.
    pub fn from_config(config: &CollaboratorConfig) -> Result<Self, reqwest::Error> {
        if !config.is_remote() {
            return Ok(Self::default());
        }
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        let accounts = config.accounts_url.clone().map(|url| {
            tracing::info!(%url, "orders use remote account directory");
            Arc::new(HttpAccountDirectory::new(client.clone(), url)) as DynAccountDirectory
        });
        let reservations = config.inventory_url.clone().map(|url| {
            tracing::info!(%url, "orders use remote item reservations");
            Arc::new(HttpItemReservations::new(client.clone(), url)) as DynItemReservations
        });
        Ok(Self {
            accounts,
            reservations,
        })
    }
}

pub struct AppServices {
    pub engine: Arc<Engine>,
    pub catalog: CatalogQuery<DynProductStore>,
    pub accounts: Arc<Accounts>,
    pub orders: Orders,
}

impl AppServices {
    pub fn new(products: DynProductStore, accounts: DynAccountStore, orders: DynOrderStore) -> Self {
        Self::with_collaborators(products, accounts, orders, RemoteCollaborators::default())
    }

    pub fn with_collaborators(
        products: DynProductStore,
        accounts: DynAccountStore,
        orders: DynOrderStore,
        remote: RemoteCollaborators,
    ) -> Self {
        let engine = Arc::new(ReservationEngine::new(
            products.clone(),
            Arc::new(ReservationLockRegistry::new()),
        ));
        let accounts = Arc::new(AccountService::new(accounts));

        let directory = remote
            .accounts
            .unwrap_or_else(|| accounts.clone() as DynAccountDirectory);
        let reservations = remote
            .reservations
            .unwrap_or_else(|| engine.clone() as DynItemReservations);
        let orders = OrderService::new(directory, reservations, orders);

        Self {
            engine,
            catalog: CatalogQuery::new(products),
            accounts,
            orders,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryProductStore::new()),
            Arc::new(InMemoryAccountStore::new()),
            Arc::new(InMemoryOrderStore::new()),
        )
    }

    pub async fn from_storage(
        storage: &StorageConfig,
        remote: RemoteCollaborators,
    ) -> Result<Self, StoreError> {
        match storage {
            StorageConfig::Memory => {
                tracing::info!("using in-memory storage");
                Ok(Self::with_collaborators(
                    Arc::new(InMemoryProductStore::new()),
                    Arc::new(InMemoryAccountStore::new()),
                    Arc::new(InMemoryOrderStore::new()),
                    remote,
                ))
            }
            StorageConfig::Postgres {
                database_url,
                max_connections,
            } => {
                let pool = storefront_infra::connect(database_url, *max_connections).await?;
                storefront_infra::migrate(&pool).await?;
                tracing::info!("using postgres storage");

                let stores = PostgresStores::new(pool);
                Ok(Self::with_collaborators(
                    Arc::new(stores.products),
                    Arc::new(stores.accounts),
                    Arc::new(stores.orders),
                    remote,
                ))
            }
        }
    }
}
