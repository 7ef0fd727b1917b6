//! Spending allowances the strategy hands to the staking protocol and router.
//!
//! Grants are only ever moved between zero and [`MAX_ALLOWANCE`], and a
//! re-grant always zeroes first: some token contracts reject changing one
//! non-zero allowance into another. Token allowances carry an expiration
//! ledger, so an active strategy renews lapsed grants before it stakes or
//! swaps.

use soroban_sdk::{contracttype, log, token, Address, Env, Vec};

use crate::{
    storage,
    types::{Bindings, Position},
};

pub const MAX_ALLOWANCE: i128 = i128::MAX;
/// Lifetime of a grant in ledgers, kept under the network's maximum entry TTL.
pub const ALLOWANCE_LEDGERS: u32 = 3_000_000;

/// One tracked (token, spender) pair.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Grant {
    pub token: Address,
    pub spender: Address,
}

/// Current allowance of one tracked grant, as reported by the token.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Allowance {
    pub token: Address,
    pub spender: Address,
    pub amount: i128,
}

/// Every (token, spender) pair the lifecycle pulls through, deduplicated.
pub fn plan(env: &Env, bindings: &Bindings) -> Vec<Grant> {
    let mut grants = Vec::new(env);
    add(&mut grants, &bindings.held, &bindings.staking);
    add(&mut grants, &bindings.reward, &bindings.router);
    add(&mut grants, &bindings.hub, &bindings.router);
    if let Position::Paired(token_0, token_1) = &bindings.position {
        add(&mut grants, token_0, &bindings.router);
        add(&mut grants, token_1, &bindings.router);
    }
    grants
}

fn add(grants: &mut Vec<Grant>, token: &Address, spender: &Address) {
    let grant = Grant {
        token: token.clone(),
        spender: spender.clone(),
    };
    if !grants.contains(&grant) {
        grants.push_back(grant);
    }
}

pub fn track(env: &Env, bindings: &Bindings) {
    storage::set_grants(env, &plan(env, bindings));
}

pub fn grant_all(env: &Env) {
    let expiration = env.ledger().sequence().saturating_add(ALLOWANCE_LEDGERS);
    for grant in storage::grants(env).iter() {
        approve(env, &grant, MAX_ALLOWANCE, expiration);
    }
}

pub fn revoke_all(env: &Env) {
    let expiration = env.ledger().sequence();
    for grant in storage::grants(env).iter() {
        approve(env, &grant, 0, expiration);
    }
}

/// Re-grants every tracked allowance the token reports as zero. An expired
/// allowance reads as zero, so a live grant is never overwritten.
pub fn renew_lapsed(env: &Env) {
    let this = env.current_contract_address();
    let expiration = env.ledger().sequence().saturating_add(ALLOWANCE_LEDGERS);
    let mut renewed: u32 = 0;
    for grant in storage::grants(env).iter() {
        if token::Client::new(env, &grant.token).allowance(&this, &grant.spender) == 0 {
            approve(env, &grant, MAX_ALLOWANCE, expiration);
            renewed += 1;
        }
    }
    if renewed > 0 {
        log!(env, "lapsed allowances renewed", renewed);
    }
}

/// Zero every grant, then raise every grant back to the maximum.
pub fn reset(env: &Env) {
    revoke_all(env);
    grant_all(env);
    log!(env, "allowances reset", storage::grants(env).len());
}

pub fn allowances(env: &Env) -> Vec<Allowance> {
    let this = env.current_contract_address();
    let mut out = Vec::new(env);
    for grant in storage::grants(env).iter() {
        let amount = token::Client::new(env, &grant.token).allowance(&this, &grant.spender);
        out.push_back(Allowance {
            token: grant.token,
            spender: grant.spender,
            amount,
        });
    }
    out
}

fn approve(env: &Env, grant: &Grant, amount: i128, expiration_ledger: u32) {
    token::Client::new(env, &grant.token).approve(
        &env.current_contract_address(),
        &grant.spender,
        &amount,
        &expiration_ledger,
    );
}
