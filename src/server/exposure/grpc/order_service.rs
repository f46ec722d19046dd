//! gRPC OrderService implementation
//!
//! Every method delegates to the shared `OrderService` facade.

use super::convert::{status_from, totals_to_proto};
use super::proto::{
    AllOrders, DrinkList, OrderRequest, TotalList,
    order_service_server::OrderService as OrderServiceRpc,
};
use crate::core::{OrderService, PlaceOrder, ValidationError};
use std::sync::Arc;
use tonic::{Request, Response, Status};

pub struct OrderServiceImpl {
    service: Arc<OrderService>,
}

impl OrderServiceImpl {
    pub fn new(service: Arc<OrderService>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl OrderServiceRpc for OrderServiceImpl {
    async fn get_drinks(&self, _request: Request<()>) -> Result<Response<DrinkList>, Status> {
        let drinks = self.service.catalog().await.map_err(status_from)?;

        Ok(Response::new(DrinkList {
            drinks: drinks.iter().map(Into::into).collect(),
        }))
    }

    async fn order_drink(&self, request: Request<OrderRequest>) -> Result<Response<bool>, Status> {
        let item = request.into_inner().item.ok_or_else(|| {
            status_from(ValidationError::Malformed("order item is missing".to_string()).into())
        })?;

        self.service
            .place_order(PlaceOrder::from(item))
            .await
            .map_err(status_from)?;

        Ok(Response::new(true))
    }

    async fn get_orders(&self, _request: Request<()>) -> Result<Response<AllOrders>, Status> {
        let orders = self.service.orders().await.map_err(status_from)?;

        Ok(Response::new(AllOrders {
            orders: orders.iter().map(Into::into).collect(),
        }))
    }

    async fn get_totals(&self, _request: Request<()>) -> Result<Response<TotalList>, Status> {
        let totals = self.service.totals().await.map_err(status_from)?;

        Ok(Response::new(TotalList {
            totals: totals_to_proto(&totals),
        }))
    }
}
