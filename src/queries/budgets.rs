use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{parse_wire_date, wire_date};
use crate::cache::CollectionSource;
use crate::error::{GatewayError, GatewayResult};
use crate::gateway::Gateway;
use crate::models::{Budget, NewBudget};
use crate::money::{cents_from_decimal, decimal_from_cents};

const LIST_BUDGETS: &str = "
    query {
        budgets {
            _id
            name
            amount
            startDate
            endDate
            showInMenu
            sortOrder
        }
    }
";

const CREATE_BUDGET: &str = "
    mutation CreateBudget(
        $name: String!
        $amount: Float!
        $startDate: DateTime!
        $endDate: DateTime
        $showInMenu: Boolean!
        $sortOrder: Float!
    ) {
        createBudget(
            budgetInput: {
                name: $name
                amount: $amount
                startDate: $startDate
                endDate: $endDate
                showInMenu: $showInMenu
                sortOrder: $sortOrder
            }
        ) {
            _id
            name
            amount
            startDate
            endDate
            showInMenu
            sortOrder
        }
    }
";

const UPDATE_BUDGET: &str = "
    mutation EditBudget(
        $id: String!
        $name: String!
        $amount: Float!
        $startDate: DateTime!
        $endDate: DateTime
        $showInMenu: Boolean!
        $sortOrder: Float!
    ) {
        editBudget(
            _id: $id
            budgetInput: {
                name: $name
                amount: $amount
                startDate: $startDate
                endDate: $endDate
                showInMenu: $showInMenu
                sortOrder: $sortOrder
            }
        ) {
            _id
            name
            amount
            startDate
            endDate
            showInMenu
            sortOrder
        }
    }
";

const DELETE_BUDGET: &str = "
    mutation DeleteBudget($id: String!) {
        deleteBudget(_id: $id) {
            _id
        }
    }
";

#[derive(Debug, Deserialize)]
struct BudgetRow {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    amount: f64,
    #[serde(rename = "startDate")]
    start_date: String,
    #[serde(rename = "endDate")]
    end_date: Option<String>,
    #[serde(rename = "showInMenu")]
    show_in_menu: bool,
    #[serde(rename = "sortOrder")]
    sort_order: f64,
}

#[derive(Debug, Deserialize)]
struct BudgetsData {
    budgets: Vec<BudgetRow>,
}

fn into_model(row: BudgetRow) -> GatewayResult<Budget> {
    let end_date = match row.end_date {
        Some(ref raw) => Some(parse_wire_date(raw)?),
        None => None,
    };
    Ok(Budget {
        id: row.id,
        name: row.name,
        amount_cents: cents_from_decimal(row.amount),
        start_date: parse_wire_date(&row.start_date)?,
        end_date,
        show_in_menu: row.show_in_menu,
        sort_order: row.sort_order as i64,
    })
}

fn payload_variables(payload: &NewBudget) -> serde_json::Value {
    json!({
        "name": payload.name,
        "amount": decimal_from_cents(payload.amount_cents),
        "startDate": wire_date(payload.start_date),
        "endDate": payload.end_date.map(wire_date),
        "showInMenu": payload.show_in_menu,
        "sortOrder": payload.sort_order,
    })
}

/// Fetch all budgets, sorted by display rank (ties keep server order).
pub async fn list_budgets(gateway: &Gateway) -> GatewayResult<Vec<Budget>> {
    let data = gateway.execute(LIST_BUDGETS, json!({})).await?;
    let parsed: BudgetsData = serde_json::from_value(data).map_err(|_| GatewayError::Malformed)?;
    let mut budgets = parsed
        .budgets
        .into_iter()
        .map(into_model)
        .collect::<GatewayResult<Vec<_>>>()?;
    budgets.sort_by_key(|b| b.sort_order);
    Ok(budgets)
}

pub async fn create_budget(gateway: &Gateway, payload: &NewBudget) -> GatewayResult<Budget> {
    let data = gateway.execute(CREATE_BUDGET, payload_variables(payload)).await?;
    let row: BudgetRow = serde_json::from_value(
        data.get("createBudget").cloned().ok_or(GatewayError::Malformed)?,
    )
    .map_err(|_| GatewayError::Malformed)?;
    into_model(row)
}

pub async fn update_budget(
    gateway: &Gateway,
    id: &str,
    payload: &NewBudget,
) -> GatewayResult<Budget> {
    let mut variables = payload_variables(payload);
    variables["id"] = json!(id);
    let data = gateway.execute(UPDATE_BUDGET, variables).await?;
    let row: BudgetRow = serde_json::from_value(
        data.get("editBudget").cloned().ok_or(GatewayError::Malformed)?,
    )
    .map_err(|_| GatewayError::Malformed)?;
    into_model(row)
}

pub async fn delete_budget(gateway: &Gateway, id: &str) -> GatewayResult<()> {
    gateway.execute(DELETE_BUDGET, json!({ "id": id })).await?;
    Ok(())
}

/// Gateway-backed list source for the entity cache.
pub struct BudgetSource {
    gateway: Arc<Gateway>,
}

impl BudgetSource {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl CollectionSource<Budget> for BudgetSource {
    async fn list(&self) -> GatewayResult<Vec<Budget>> {
        list_budgets(&self.gateway).await
    }
}
