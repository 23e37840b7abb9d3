use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{parse_wire_date, wire_date};
use crate::cache::CollectionSource;
use crate::error::{GatewayError, GatewayResult};
use crate::gateway::Gateway;
use crate::models::{Expense, NewExpense};
use crate::money::{cents_from_decimal, decimal_from_cents};

const LIST_EXPENSES: &str = "
    query {
        expenses {
            _id
            date
            price
            place
            reason
            tags
            recurring
            recurUntil
            budget(populate: true) {
                _id
            }
        }
    }
";

const CREATE_EXPENSE: &str = "
    mutation CreateExpense(
        $date: DateTime!
        $price: Float!
        $place: String!
        $reason: String
        $tags: [String!]
        $recurring: Boolean!
        $recurUntil: DateTime
        $budget: String!
    ) {
        createExpense(
            expenseInput: {
                date: $date
                price: $price
                place: $place
                reason: $reason
                tags: $tags
                recurring: $recurring
                recurUntil: $recurUntil
                budget: $budget
            }
        ) {
            _id
            date
            price
            place
            reason
            tags
            recurring
            recurUntil
            budget(populate: true) {
                _id
            }
        }
    }
";

const UPDATE_EXPENSE: &str = "
    mutation EditExpense(
        $id: String!
        $date: DateTime!
        $price: Float!
        $place: String!
        $reason: String
        $tags: [String!]
        $recurring: Boolean!
        $recurUntil: DateTime
        $budget: String!
    ) {
        editExpense(
            _id: $id
            expenseInput: {
                date: $date
                price: $price
                place: $place
                reason: $reason
                tags: $tags
                recurring: $recurring
                recurUntil: $recurUntil
                budget: $budget
            }
        ) {
            _id
            date
            price
            place
            reason
            tags
            recurring
            recurUntil
            budget(populate: true) {
                _id
            }
        }
    }
";

const DELETE_EXPENSE: &str = "
    mutation DeleteExpense($id: String!) {
        deleteExpense(_id: $id) {
            _id
        }
    }
";

#[derive(Debug, Deserialize)]
struct BudgetRef {
    #[serde(rename = "_id")]
    id: String,
}

#[derive(Debug, Deserialize)]
struct ExpenseRow {
    #[serde(rename = "_id")]
    id: String,
    date: String,
    price: f64,
    place: String,
    reason: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    recurring: bool,
    #[serde(rename = "recurUntil")]
    recur_until: Option<String>,
    budget: BudgetRef,
}

#[derive(Debug, Deserialize)]
struct ExpensesData {
    expenses: Vec<ExpenseRow>,
}

fn into_model(row: ExpenseRow) -> GatewayResult<Expense> {
    let recur_until = match row.recur_until {
        Some(ref raw) => Some(parse_wire_date(raw)?),
        None => None,
    };
    Ok(Expense {
        id: row.id,
        date: parse_wire_date(&row.date)?,
        price_cents: cents_from_decimal(row.price),
        place: row.place,
        reason: row.reason,
        tags: row.tags,
        recurring: row.recurring,
        recur_until,
        budget_id: row.budget.id,
    })
}

fn payload_variables(payload: &NewExpense) -> serde_json::Value {
    json!({
        "date": wire_date(payload.date),
        "price": decimal_from_cents(payload.price_cents),
        "place": payload.place,
        "reason": payload.reason,
        "tags": payload.tags,
        "recurring": payload.recurring,
        // Sent verbatim: omitting the end date on an edit must not silently
        // drop an existing one.
        "recurUntil": payload.recur_until.map(wire_date),
        "budget": payload.budget_id,
    })
}

pub async fn list_expenses(gateway: &Gateway) -> GatewayResult<Vec<Expense>> {
    let data = gateway.execute(LIST_EXPENSES, json!({})).await?;
    let parsed: ExpensesData = serde_json::from_value(data).map_err(|_| GatewayError::Malformed)?;
    parsed.expenses.into_iter().map(into_model).collect()
}

pub async fn create_expense(gateway: &Gateway, payload: &NewExpense) -> GatewayResult<Expense> {
    let data = gateway
        .execute(CREATE_EXPENSE, payload_variables(payload))
        .await?;
    let row: ExpenseRow = serde_json::from_value(
        data.get("createExpense").cloned().ok_or(GatewayError::Malformed)?,
    )
    .map_err(|_| GatewayError::Malformed)?;
    into_model(row)
}

pub async fn update_expense(
    gateway: &Gateway,
    id: &str,
    payload: &NewExpense,
) -> GatewayResult<Expense> {
    let mut variables = payload_variables(payload);
    variables["id"] = json!(id);
    let data = gateway.execute(UPDATE_EXPENSE, variables).await?;
    let row: ExpenseRow = serde_json::from_value(
        data.get("editExpense").cloned().ok_or(GatewayError::Malformed)?,
    )
    .map_err(|_| GatewayError::Malformed)?;
    into_model(row)
}

pub async fn delete_expense(gateway: &Gateway, id: &str) -> GatewayResult<()> {
    gateway.execute(DELETE_EXPENSE, json!({ "id": id })).await?;
    Ok(())
}

/// Gateway-backed list source for the entity cache.
pub struct ExpenseSource {
    gateway: Arc<Gateway>,
}

impl ExpenseSource {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl CollectionSource<Expense> for ExpenseSource {
    async fn list(&self) -> GatewayResult<Vec<Expense>> {
        list_expenses(&self.gateway).await
    }
}
