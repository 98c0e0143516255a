//! Internal users, for assigning tasks.

use crate::odoo::client::OdooClient;
use crate::odoo::error::OdooResult;
use crate::odoo::transport::Transport;
use crate::odoo::values::{Domain, Record, SearchOptions};

pub const USER_MODEL: &str = "res.users";

/// Default number of users returned by a search.
pub const DEFAULT_USER_LIMIT: usize = 20;

impl<T: Transport> OdooClient<T> {
    /// Internal (non-portal) users whose name or email contains `query`.
    /// An empty query lists them all.
    pub async fn search_users(&self, query: &str, limit: usize) -> OdooResult<Vec<Record>> {
        let query = query.trim();
        let domain = if query.is_empty() {
            Domain::all().leaf("share", "=", false)
        } else {
            Domain::all()
                .and()
                .leaf("share", "=", false)
                .or()
                .leaf("name", "ilike", query)
                .leaf("email", "ilike", query)
        };

        self.find(
            USER_MODEL,
            &domain,
            &SearchOptions::new()
                .fields(&["id", "name", "email"])
                .limit(limit)
                .order("name asc"),
        )
        .await
    }
}
