// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Amoy Wallet Contributors

use std::sync::Arc;

use crate::service::WalletService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WalletService>,
}

impl AppState {
    pub fn new(service: WalletService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
