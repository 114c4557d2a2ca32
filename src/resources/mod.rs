//! Resource operations built on the generic request pipeline.
//!
//! [`Reader`] and [`Writer`] are the two capability sets handed out by
//! [`new_read_only`](crate::new_read_only) and
//! [`new_read_write`](crate::new_read_write); [`DbClient`] implements both.
//! Parameters are validated here, before any request is sent.

mod types;

pub use types::{
    Application, Blockchain, LoadBalancer, LoadBalancerUser, NewApplication, NewPortalUser,
    PayPlan, PortalUserId, RoleName, UpdateApplication, UpdateLoadBalancer,
};

use async_trait::async_trait;
use serde::Serialize;

use crate::client::DbClient;
use crate::error::{Error, Result};

const BLOCKCHAIN: &str = "blockchain";
const APPLICATION: &str = "application";
const LOAD_BALANCER: &str = "load_balancer";
const PAY_PLAN: &str = "pay_plan";
const USER: &str = "user";

/// Read-only operations.
#[async_trait]
pub trait Reader: Send + Sync {
    async fn blockchains(&self) -> Result<Vec<Blockchain>>;
    async fn blockchain(&self, id: &str) -> Result<Blockchain>;
    async fn applications(&self) -> Result<Vec<Application>>;
    async fn application(&self, id: &str) -> Result<Application>;
    async fn user_applications(&self, user_id: &str) -> Result<Vec<Application>>;
    async fn load_balancers(&self) -> Result<Vec<LoadBalancer>>;
    async fn load_balancer(&self, id: &str) -> Result<LoadBalancer>;
    /// Load balancers of a user, optionally filtered by the user's role name.
    async fn user_load_balancers(
        &self,
        user_id: &str,
        role: Option<&str>,
    ) -> Result<Vec<LoadBalancer>>;
    async fn pay_plans(&self) -> Result<Vec<PayPlan>>;
    async fn pay_plan(&self, plan_type: &str) -> Result<PayPlan>;
    async fn portal_user_id(&self, provider_user_id: &str) -> Result<PortalUserId>;
    /// Number of load balancer invites the user has not answered yet.
    async fn pending_invites(&self, user_id: &str) -> Result<u64>;
}

/// Read and write operations.
#[async_trait]
pub trait Writer: Reader {
    async fn create_blockchain(&self, blockchain: &Blockchain) -> Result<Blockchain>;
    async fn activate_blockchain(&self, id: &str, active: bool) -> Result<bool>;
    async fn create_application(
        &self,
        user_id: &str,
        application: &NewApplication,
    ) -> Result<Application>;
    async fn update_application(
        &self,
        id: &str,
        update: &UpdateApplication,
    ) -> Result<Application>;
    /// Removes the application and returns it as it was before removal.
    async fn remove_application(&self, id: &str) -> Result<Application>;
    async fn create_load_balancer(&self, load_balancer: &LoadBalancer) -> Result<LoadBalancer>;
    async fn update_load_balancer(
        &self,
        id: &str,
        update: &UpdateLoadBalancer,
    ) -> Result<LoadBalancer>;
    async fn remove_load_balancer(&self, id: &str) -> Result<LoadBalancer>;
    async fn create_portal_user(&self, user: &NewPortalUser) -> Result<PortalUserId>;
}

fn require(value: &str, name: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::MissingParameter(name));
    }
    Ok(())
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(Error::Encode)
}

#[derive(Serialize)]
struct Activation {
    active: bool,
}

#[async_trait]
impl Reader for DbClient {
    #[tracing::instrument(skip(self))]
    async fn blockchains(&self) -> Result<Vec<Blockchain>> {
        let url = self.endpoint().url(&[BLOCKCHAIN]);
        self.fetch(url, self.read_headers()).await
    }

    #[tracing::instrument(skip(self))]
    async fn blockchain(&self, id: &str) -> Result<Blockchain> {
        require(id, "blockchain id")?;
        let url = self.endpoint().url(&[BLOCKCHAIN, id]);
        self.fetch(url, self.read_headers()).await
    }

    #[tracing::instrument(skip(self))]
    async fn applications(&self) -> Result<Vec<Application>> {
        let url = self.endpoint().url(&[APPLICATION]);
        self.fetch(url, self.read_headers()).await
    }

    #[tracing::instrument(skip(self))]
    async fn application(&self, id: &str) -> Result<Application> {
        require(id, "application id")?;
        let url = self.endpoint().url(&[APPLICATION, id]);
        self.fetch(url, self.read_headers()).await
    }

    #[tracing::instrument(skip(self))]
    async fn user_applications(&self, user_id: &str) -> Result<Vec<Application>> {
        require(user_id, "user id")?;
        let url = self.endpoint().url(&[USER, user_id, APPLICATION]);
        self.fetch(url, self.read_headers()).await
    }

    #[tracing::instrument(skip(self))]
    async fn load_balancers(&self) -> Result<Vec<LoadBalancer>> {
        let url = self.endpoint().url(&[LOAD_BALANCER]);
        self.fetch(url, self.read_headers()).await
    }

    #[tracing::instrument(skip(self))]
    async fn load_balancer(&self, id: &str) -> Result<LoadBalancer> {
        require(id, "load balancer id")?;
        let url = self.endpoint().url(&[LOAD_BALANCER, id]);
        self.fetch(url, self.read_headers()).await
    }

    #[tracing::instrument(skip(self))]
    async fn user_load_balancers(
        &self,
        user_id: &str,
        role: Option<&str>,
    ) -> Result<Vec<LoadBalancer>> {
        require(user_id, "user id")?;
        let role = role.map(str::parse::<RoleName>).transpose()?;

        let segments = [USER, user_id, LOAD_BALANCER];
        let url = match role {
            Some(role) => self
                .endpoint()
                .url_with_query(&segments, &[("filter", role.as_str())]),
            None => self.endpoint().url(&segments),
        };
        self.fetch(url, self.read_headers()).await
    }

    #[tracing::instrument(skip(self))]
    async fn pay_plans(&self) -> Result<Vec<PayPlan>> {
        let url = self.endpoint().url(&[PAY_PLAN]);
        self.fetch(url, self.read_headers()).await
    }

    #[tracing::instrument(skip(self))]
    async fn pay_plan(&self, plan_type: &str) -> Result<PayPlan> {
        require(plan_type, "pay plan type")?;
        let url = self.endpoint().url(&[PAY_PLAN, plan_type]);
        self.fetch(url, self.read_headers()).await
    }

    #[tracing::instrument(skip(self))]
    async fn portal_user_id(&self, provider_user_id: &str) -> Result<PortalUserId> {
        require(provider_user_id, "provider user id")?;
        let url = self.endpoint().url(&[USER, provider_user_id, "portal_id"]);
        self.fetch(url, self.read_headers()).await
    }

    #[tracing::instrument(skip(self))]
    async fn pending_invites(&self, user_id: &str) -> Result<u64> {
        require(user_id, "user id")?;
        let url = self.endpoint().url(&[USER, user_id, "pending_count"]);
        self.fetch(url, self.read_headers()).await
    }
}

#[async_trait]
impl Writer for DbClient {
    #[tracing::instrument(skip(self, blockchain), fields(ticker = %blockchain.ticker))]
    async fn create_blockchain(&self, blockchain: &Blockchain) -> Result<Blockchain> {
        require(&blockchain.ticker, "blockchain ticker")?;
        let body = encode(blockchain)?;
        let url = self.endpoint().url(&[BLOCKCHAIN]);
        self.create(url, self.write_headers(), body).await
    }

    #[tracing::instrument(skip(self))]
    async fn activate_blockchain(&self, id: &str, active: bool) -> Result<bool> {
        require(id, "blockchain id")?;
        let body = encode(&Activation { active })?;
        let url = self.endpoint().url(&[BLOCKCHAIN, id, "activate"]);
        self.create(url, self.write_headers(), body).await
    }

    #[tracing::instrument(skip(self, application))]
    async fn create_application(
        &self,
        user_id: &str,
        application: &NewApplication,
    ) -> Result<Application> {
        require(user_id, "user id")?;
        require(&application.name, "application name")?;
        let body = encode(application)?;
        let url = self.endpoint().url(&[USER, user_id, APPLICATION]);
        self.create(url, self.write_headers(), body).await
    }

    #[tracing::instrument(skip(self, update))]
    async fn update_application(
        &self,
        id: &str,
        update: &UpdateApplication,
    ) -> Result<Application> {
        require(id, "application id")?;
        let body = encode(update)?;
        let url = self.endpoint().url(&[APPLICATION, id]);
        self.replace(url, self.write_headers(), body).await
    }

    #[tracing::instrument(skip(self))]
    async fn remove_application(&self, id: &str) -> Result<Application> {
        require(id, "application id")?;
        let url = self.endpoint().url(&[APPLICATION, id]);
        self.remove(url, self.write_headers()).await
    }

    #[tracing::instrument(skip(self, load_balancer), fields(name = %load_balancer.name))]
    async fn create_load_balancer(&self, load_balancer: &LoadBalancer) -> Result<LoadBalancer> {
        require(&load_balancer.user_id, "user id")?;
        let body = encode(load_balancer)?;
        let url = self.endpoint().url(&[LOAD_BALANCER]);
        self.create(url, self.write_headers(), body).await
    }

    #[tracing::instrument(skip(self, update))]
    async fn update_load_balancer(
        &self,
        id: &str,
        update: &UpdateLoadBalancer,
    ) -> Result<LoadBalancer> {
        require(id, "load balancer id")?;
        let body = encode(update)?;
        let url = self.endpoint().url(&[LOAD_BALANCER, id]);
        self.replace(url, self.write_headers(), body).await
    }

    #[tracing::instrument(skip(self))]
    async fn remove_load_balancer(&self, id: &str) -> Result<LoadBalancer> {
        require(id, "load balancer id")?;
        let url = self.endpoint().url(&[LOAD_BALANCER, id]);
        self.remove(url, self.write_headers()).await
    }

    #[tracing::instrument(skip(self, user))]
    async fn create_portal_user(&self, user: &NewPortalUser) -> Result<PortalUserId> {
        require(&user.email, "email")?;
        require(&user.provider_user_id, "provider user id")?;
        let body = encode(user)?;
        let url = self.endpoint().url(&[USER]);
        self.create(url, self.write_headers(), body).await
    }
}
