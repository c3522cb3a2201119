//! Query and mutation roots

use super::connection::{OffsetCursor, Page, paginate};
use super::types::{
    BulkCreateCustomers, CreateCustomer, CreateOrder, CreateProduct, CustomerFilterInput,
    CustomerInputObject, CustomerType, OrderFilterInput, OrderInputObject, OrderType,
    ProductFilterInput, ProductInputObject, ProductType, UpdateLowStockProducts,
};
use crate::core::query::{
    CustomerQuery, ListQuery, OrderQuery, ProductQuery, SortField, parse_order_by,
};
use crate::core::service::CrmService;
use async_graphql::connection::query;
use async_graphql::{Context, EmptySubscription, Object, Result, Schema};

pub type CrmSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the executable schema around a service
pub fn build_schema(service: CrmService) -> CrmSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(service)
        .finish()
}

/// Build a list query from the shared connection arguments
///
/// `orderBy` entries may also be comma-separated (`"name,-created_at"`).
fn list_query<F, S: SortField>(
    filter: F,
    search: Option<String>,
    order_by: Option<Vec<String>>,
) -> Result<ListQuery<F, S>> {
    let keys: Vec<String> = order_by
        .unwrap_or_default()
        .iter()
        .flat_map(|entry| entry.split(','))
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(String::from)
        .collect();

    Ok(ListQuery {
        filter,
        search,
        order_by: parse_order_by(&keys)?,
    })
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn hello(&self) -> &'static str {
        "Hello, GraphQL!"
    }

    #[allow(clippy::too_many_arguments)]
    async fn all_customers(
        &self,
        ctx: &Context<'_>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
        filter: Option<CustomerFilterInput>,
        search: Option<String>,
        order_by: Option<Vec<String>>,
    ) -> Result<Page<CustomerType>> {
        let list: CustomerQuery = list_query(filter.unwrap_or_default().into(), search, order_by)?;
        let customers = ctx.data::<CrmService>()?.customers(&list).await?;

        query(
            after,
            before,
            first,
            last,
            |after: Option<OffsetCursor>, before, first, last| async move {
                Ok::<_, async_graphql::Error>(paginate(
                    customers,
                    after,
                    before,
                    first,
                    last,
                    CustomerType,
                ))
            },
        )
        .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn all_products(
        &self,
        ctx: &Context<'_>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
        filter: Option<ProductFilterInput>,
        search: Option<String>,
        order_by: Option<Vec<String>>,
    ) -> Result<Page<ProductType>> {
        let list: ProductQuery = list_query(filter.unwrap_or_default().into(), search, order_by)?;
        let products = ctx.data::<CrmService>()?.products(&list).await?;

        query(
            after,
            before,
            first,
            last,
            |after: Option<OffsetCursor>, before, first, last| async move {
                Ok::<_, async_graphql::Error>(paginate(
                    products,
                    after,
                    before,
                    first,
                    last,
                    ProductType,
                ))
            },
        )
        .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn all_orders(
        &self,
        ctx: &Context<'_>,
        after: Option<String>,
        before: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
        filter: Option<OrderFilterInput>,
        search: Option<String>,
        order_by: Option<Vec<String>>,
    ) -> Result<Page<OrderType>> {
        let list: OrderQuery = list_query(filter.unwrap_or_default().into(), search, order_by)?;
        let orders = ctx.data::<CrmService>()?.orders(&list).await?;

        query(
            after,
            before,
            first,
            last,
            |after: Option<OffsetCursor>, before, first, last| async move {
                Ok::<_, async_graphql::Error>(paginate(
                    orders, after, before, first, last, OrderType,
                ))
            },
        )
        .await
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_customer(
        &self,
        ctx: &Context<'_>,
        input: CustomerInputObject,
    ) -> Result<CreateCustomer> {
        let outcome = ctx
            .data::<CrmService>()?
            .create_customer(input.into())
            .await?;

        let message = if outcome.is_ok() {
            "Customer created successfully"
        } else {
            "Failed to create customer"
        };
        Ok(CreateCustomer {
            customer: outcome.value.map(CustomerType),
            message: message.to_string(),
            errors: outcome.errors,
        })
    }

    async fn bulk_create_customers(
        &self,
        ctx: &Context<'_>,
        input: Vec<CustomerInputObject>,
    ) -> Result<BulkCreateCustomers> {
        let outcome = ctx
            .data::<CrmService>()?
            .bulk_create_customers(input.into_iter().map(Into::into).collect())
            .await?;

        Ok(BulkCreateCustomers {
            customers: outcome.customers.into_iter().map(CustomerType).collect(),
            errors: outcome.errors,
        })
    }

    async fn create_product(
        &self,
        ctx: &Context<'_>,
        input: ProductInputObject,
    ) -> Result<CreateProduct> {
        let outcome = ctx
            .data::<CrmService>()?
            .create_product(input.into())
            .await?;

        Ok(CreateProduct {
            product: outcome.value.map(ProductType),
            errors: outcome.errors,
        })
    }

    async fn create_order(&self, ctx: &Context<'_>, input: OrderInputObject) -> Result<CreateOrder> {
        let outcome = ctx.data::<CrmService>()?.create_order(input.into()).await?;

        Ok(CreateOrder {
            order: outcome.value.map(OrderType),
            errors: outcome.errors,
        })
    }

    async fn update_low_stock_products(&self, ctx: &Context<'_>) -> Result<UpdateLowStockProducts> {
        let outcome = ctx
            .data::<CrmService>()?
            .update_low_stock_products()
            .await?;

        Ok(UpdateLowStockProducts {
            success: true,
            message: outcome.message(),
            count: outcome.products.len(),
            updated_products: outcome.products.into_iter().map(ProductType).collect(),
        })
    }
}
