//! Split-expense ledger - shared expenses and the settlement of their shares.
//!
//! An expense and its shares are written in one transaction, and the shares always add up
//! to the expense total. Shares settle through `pending -> paid` or `pending -> declined`;
//! the settlement write is conditional on the share still being pending, so concurrent
//! settlements of the same share cannot both succeed.

use crate::{
    core::{activity::spawn_activity, user::find_users_by_ids},
    entities::{
        ActivityType, ShareStatus, SplitExpense, SplitExpenseShare, split_expense,
        split_expense_share,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveEnum, DatabaseTransaction, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{error, info, instrument};

/// Smallest difference between the share sum and the total that counts as a mismatch.
///
/// This only absorbs binary floating-point noise; a sub-cent difference is still a mismatch.
pub const AMOUNT_EPSILON: f64 = 1e-9;

/// One participant's requested portion of a new expense.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareInput {
    /// Participant's user ID
    pub user_id: String,
    /// Amount owed by the participant
    pub amount: f64,
}

/// Everything needed to record a new split expense.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSplitExpense {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub total_amount: f64,
    pub currency: String,
    pub date: NaiveDate,
    pub shares: Vec<ShareInput>,
}

/// A share decorated with the participant's directory details.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareDetails {
    pub share: split_expense_share::Model,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

/// An expense together with all of its shares.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitExpenseDetails {
    pub expense: split_expense::Model,
    pub shares: Vec<ShareDetails>,
}

/// What a user is owed and owes across pending shares, in one currency.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitBalance {
    pub currency: String,
    /// Pending shares of others on expenses the user created
    pub owed_to_you: f64,
    /// The user's own pending shares on expenses others created
    pub you_owe: f64,
}

/// Checks a new expense without touching the store.
///
/// # Errors
/// `Validation` for malformed input, `AmountMismatch` when the shares do not add up to
/// the total.
pub fn validate_new_expense(new: &NewSplitExpense) -> Result<()> {
    if new.title.trim().is_empty() {
        return Err(Error::validation("Title cannot be empty"));
    }
    if new.category.trim().is_empty() {
        return Err(Error::validation("Category cannot be empty"));
    }
    if new.currency.trim().is_empty() {
        return Err(Error::validation("Currency cannot be empty"));
    }
    if !new.total_amount.is_finite() || new.total_amount <= 0.0 {
        return Err(Error::validation(format!(
            "Total amount must be greater than zero, got {}",
            new.total_amount
        )));
    }
    if new.shares.is_empty() {
        return Err(Error::validation("A split expense needs at least one share"));
    }

    let mut seen = BTreeSet::new();
    for share in &new.shares {
        if share.user_id.trim().is_empty() {
            return Err(Error::validation("Every share needs a user"));
        }
        if !share.amount.is_finite() || share.amount <= 0.0 {
            return Err(Error::validation(format!(
                "Share for {} must be greater than zero, got {}",
                share.user_id, share.amount
            )));
        }
        if !seen.insert(share.user_id.as_str()) {
            return Err(Error::validation(format!(
                "{} appears more than once in the shares",
                share.user_id
            )));
        }
    }

    let shares_total: f64 = new.shares.iter().map(|s| s.amount).sum();
    if !amounts_balance(shares_total, new.total_amount, new.shares.len()) {
        return Err(Error::AmountMismatch {
            total: new.total_amount,
            shares_total,
        });
    }

    Ok(())
}

/// Compares a sum of `terms` floats against the expected total.
///
/// Each addition can drift by one ulp of the running sum, so the allowed noise grows with
/// the magnitude of the total and the number of terms, but never below [`AMOUNT_EPSILON`].
#[allow(clippy::cast_precision_loss)]
fn amounts_balance(sum: f64, total: f64, terms: usize) -> bool {
    let noise = AMOUNT_EPSILON.max(total.abs() * f64::EPSILON * (terms + 1) as f64);
    (sum - total).abs() <= noise
}

/// Records a split expense and all of its shares as one unit.
///
/// The creator's own share, if present, starts out `paid`; every other share starts
/// `pending`. If any share cannot be written the expense is rolled back too, so an expense
/// never exists without shares.
#[instrument(skip(db, new), fields(title = %new.title, total = new.total_amount))]
pub async fn create_split_expense(
    db: &DatabaseConnection,
    creator_id: &str,
    new: NewSplitExpense,
) -> Result<SplitExpenseDetails> {
    validate_new_expense(&new)?;

    // Nothing after the commit may fail
    let txn = db.begin().await?;
    let written = insert_expense_with_shares(&txn, creator_id, &new).await;
    let details = match written {
        Ok((expense, shares)) => enrich(&txn, expense, shares).await,
        Err(e) => Err(e),
    };
    let details = match details {
        Ok(details) => details,
        Err(e) => {
            rollback_or_flag(txn, "create_split_expense", None).await?;
            return Err(e);
        }
    };
    txn.commit().await?;

    info!(
        expense_id = details.expense.id,
        shares = details.shares.len(),
        "Created split expense"
    );
    spawn_activity(
        db,
        creator_id,
        ActivityType::SplitExpense,
        format!(
            "Split '{}' ({:.2} {}) between {} people",
            details.expense.title,
            details.expense.total_amount,
            details.expense.currency,
            details.shares.len()
        ),
    );

    Ok(details)
}

async fn insert_expense_with_shares(
    txn: &DatabaseTransaction,
    creator_id: &str,
    new: &NewSplitExpense,
) -> Result<(split_expense::Model, Vec<split_expense_share::Model>)> {
    let now = chrono::Utc::now();

    let expense = split_expense::ActiveModel {
        title: Set(new.title.trim().to_string()),
        description: Set(new.description.clone()),
        category: Set(new.category.trim().to_string()),
        total_amount: Set(new.total_amount),
        currency: Set(new.currency.trim().to_uppercase()),
        date: Set(new.date),
        creator_id: Set(creator_id.to_string()),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    let mut shares = Vec::with_capacity(new.shares.len());
    for input in &new.shares {
        let status = if input.user_id == creator_id {
            ShareStatus::Paid
        } else {
            ShareStatus::Pending
        };

        let share = split_expense_share::ActiveModel {
            split_expense_id: Set(expense.id),
            user_id: Set(input.user_id.clone()),
            amount: Set(input.amount),
            status: Set(status),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(txn)
        .await?;
        shares.push(share);
    }

    Ok((expense, shares))
}

/// Rolls back a failed unit of work. A failed rollback is escalated, since the store may
/// now hold a partial write that needs manual reconciliation.
async fn rollback_or_flag(
    txn: DatabaseTransaction,
    operation: &'static str,
    expense_id: Option<i64>,
) -> Result<()> {
    if let Err(e) = txn.rollback().await {
        error!(
            operation,
            ?expense_id,
            "Rollback failed, split expense data may be orphaned and needs manual reconciliation: {e}"
        );
        return Err(Error::StoreUnavailable(format!(
            "{operation} could not roll back: {e}"
        )));
    }
    Ok(())
}

/// Retrieves one expense with its enriched shares.
pub async fn get_split_expense(
    db: &DatabaseConnection,
    expense_id: i64,
) -> Result<SplitExpenseDetails> {
    let expense = SplitExpense::find_by_id(expense_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Split expense", expense_id))?;

    let shares = SplitExpenseShare::find()
        .filter(split_expense_share::Column::SplitExpenseId.eq(expense_id))
        .order_by_asc(split_expense_share::Column::Id)
        .all(db)
        .await?;

    enrich(db, expense, shares).await
}

/// Retrieves every expense the user created or holds a share in, newest first.
///
/// The two sets of expense ids are unioned before anything else is fetched, so an expense
/// where the user is both creator and participant appears exactly once.
pub async fn fetch_user_split_expenses(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<SplitExpenseDetails>> {
    let created: Vec<i64> = SplitExpense::find()
        .select_only()
        .column(split_expense::Column::Id)
        .filter(split_expense::Column::CreatorId.eq(user_id))
        .into_tuple()
        .all(db)
        .await?;

    let participating: Vec<i64> = SplitExpenseShare::find()
        .select_only()
        .column(split_expense_share::Column::SplitExpenseId)
        .filter(split_expense_share::Column::UserId.eq(user_id))
        .into_tuple()
        .all(db)
        .await?;

    let expense_ids: BTreeSet<i64> = created.into_iter().chain(participating).collect();
    if expense_ids.is_empty() {
        return Ok(Vec::new());
    }

    let expenses = SplitExpense::find()
        .filter(split_expense::Column::Id.is_in(expense_ids.iter().copied()))
        .order_by_desc(split_expense::Column::Date)
        .order_by_desc(split_expense::Column::CreatedAt)
        .all(db)
        .await?;

    let shares = SplitExpenseShare::find()
        .filter(split_expense_share::Column::SplitExpenseId.is_in(expense_ids.iter().copied()))
        .order_by_asc(split_expense_share::Column::Id)
        .all(db)
        .await?;

    let user_ids: Vec<String> = shares
        .iter()
        .map(|s| s.user_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let users = find_users_by_ids(db, &user_ids).await?;

    let mut shares_by_expense: HashMap<i64, Vec<ShareDetails>> = HashMap::new();
    for share in shares {
        let user = users.get(&share.user_id);
        shares_by_expense
            .entry(share.split_expense_id)
            .or_default()
            .push(ShareDetails {
                user_name: user.map(|u| u.name.clone()),
                user_email: user.map(|u| u.email.clone()),
                share,
            });
    }

    Ok(expenses
        .into_iter()
        .map(|expense| SplitExpenseDetails {
            shares: shares_by_expense.remove(&expense.id).unwrap_or_default(),
            expense,
        })
        .collect())
}

/// Settles a share as `paid` or `declined`.
///
/// Only the participant who owes the share may settle it, and only while it is pending.
/// The write is conditional on the stored status still being `pending`; a caller that
/// loses a race against a concurrent settlement gets `InvalidStateTransition`.
#[instrument(skip(db))]
pub async fn update_expense_share_status(
    db: &DatabaseConnection,
    share_id: i64,
    status: ShareStatus,
    requesting_user_id: &str,
) -> Result<split_expense_share::Model> {
    if status == ShareStatus::Pending {
        return Err(Error::validation(
            "A share can only be marked as paid or declined",
        ));
    }

    let share = SplitExpenseShare::find_by_id(share_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Split expense share", share_id))?;

    if share.user_id != requesting_user_id {
        return Err(Error::permission_denied(
            "settle",
            format!("split expense share {share_id}"),
        ));
    }

    if share.status.is_terminal() {
        return Err(Error::InvalidStateTransition {
            share_id,
            current: share.status,
        });
    }

    let result = SplitExpenseShare::update_many()
        .col_expr(
            split_expense_share::Column::Status,
            Expr::value(status.to_value()),
        )
        .filter(split_expense_share::Column::Id.eq(share_id))
        .filter(split_expense_share::Column::Status.eq(ShareStatus::Pending.to_value()))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        // Another settlement got there first
        let current = SplitExpenseShare::find_by_id(share_id)
            .one(db)
            .await?
            .map_or(share.status, |s| s.status);
        return Err(Error::InvalidStateTransition { share_id, current });
    }

    let settled = split_expense_share::Model { status, ..share };

    info!(%status, "Settled split expense share");
    spawn_activity(
        db,
        requesting_user_id,
        ActivityType::SplitSettlement,
        format!(
            "Marked share of {:.2} on split expense {} as {status}",
            settled.amount, settled.split_expense_id
        ),
    );

    Ok(settled)
}

/// Deletes an expense and all of its shares. Creator only.
///
/// Shares are deleted before the expense inside one transaction; if the shares cannot be
/// removed the expense is left untouched.
#[instrument(skip(db))]
pub async fn delete_split_expense(
    db: &DatabaseConnection,
    expense_id: i64,
    requesting_user_id: &str,
) -> Result<()> {
    let expense = SplitExpense::find_by_id(expense_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Split expense", expense_id))?;

    if expense.creator_id != requesting_user_id {
        return Err(Error::permission_denied(
            "delete",
            format!("split expense {expense_id}"),
        ));
    }

    let txn = db.begin().await?;
    let deleted = delete_expense_with_shares(&txn, expense_id).await;
    if let Err(e) = deleted {
        rollback_or_flag(txn, "delete_split_expense", Some(expense_id)).await?;
        return Err(e);
    }
    txn.commit().await?;

    info!("Deleted split expense");
    spawn_activity(
        db,
        requesting_user_id,
        ActivityType::SplitExpense,
        format!("Deleted split expense '{}'", expense.title),
    );

    Ok(())
}

async fn delete_expense_with_shares(txn: &DatabaseTransaction, expense_id: i64) -> Result<()> {
    SplitExpenseShare::delete_many()
        .filter(split_expense_share::Column::SplitExpenseId.eq(expense_id))
        .exec(txn)
        .await?;

    SplitExpense::delete_by_id(expense_id).exec(txn).await?;
    Ok(())
}

/// Summarizes pending amounts owed to and by a user, one entry per currency.
pub async fn get_split_balances(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<SplitBalance>> {
    let mut balances: BTreeMap<String, SplitBalance> = BTreeMap::new();

    for details in fetch_user_split_expenses(db, user_id).await? {
        let created_by_user = details.expense.creator_id == user_id;
        let pending = details
            .shares
            .iter()
            .map(|d| &d.share)
            .filter(|s| s.status == ShareStatus::Pending);

        let entry = balances
            .entry(details.expense.currency.clone())
            .or_insert_with(|| SplitBalance {
                currency: details.expense.currency.clone(),
                owed_to_you: 0.0,
                you_owe: 0.0,
            });

        for share in pending {
            if created_by_user && share.user_id != user_id {
                entry.owed_to_you += share.amount;
            } else if !created_by_user && share.user_id == user_id {
                entry.you_owe += share.amount;
            }
        }
    }

    Ok(balances.into_values().collect())
}

async fn enrich<C>(
    db: &C,
    expense: split_expense::Model,
    shares: Vec<split_expense_share::Model>,
) -> Result<SplitExpenseDetails>
where
    C: ConnectionTrait,
{
    let user_ids: Vec<String> = shares.iter().map(|s| s.user_id.clone()).collect();
    let users = find_users_by_ids(db, &user_ids).await?;

    let shares = shares
        .into_iter()
        .map(|share| {
            let user = users.get(&share.user_id);
            ShareDetails {
                user_name: user.map(|u| u.name.clone()),
                user_email: user.map(|u| u.email.clone()),
                share,
            }
        })
        .collect();

    Ok(SplitExpenseDetails { expense, shares })
}
