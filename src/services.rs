use std::sync::Arc;

use crate::backend::Backend;
use crate::model::*;
use crate::repo::{ClientRepository, ListRepository, SingleRecordRepository};

macro_rules! services {
    (
        lists { $( $list:ident : $list_ty:ty ),+ $(,)? }
        singles { $( $single:ident : $single_ty:ty ),+ $(,)? }
    ) => {
        /// Every repository, bound to one backend.
        pub struct Services<B> {
            backend: Arc<B>,
            pub clients: ClientRepository<B>,
            $( pub $list: ListRepository<$list_ty, B>, )+
            $( pub $single: SingleRecordRepository<$single_ty, B>, )+
        }

        impl<B: Backend> Services<B> {
            pub fn new(backend: B) -> Self {
                let backend = Arc::new(backend);
                Self {
                    clients: ClientRepository::new(Arc::clone(&backend)),
                    $( $list: ListRepository::new(Arc::clone(&backend)), )+
                    $( $single: SingleRecordRepository::new(Arc::clone(&backend)), )+
                    backend,
                }
            }

            pub fn backend(&self) -> &B {
                &self.backend
            }
        }

        impl<B> Clone for Services<B> {
            fn clone(&self) -> Self {
                Self {
                    backend: Arc::clone(&self.backend),
                    clients: self.clients.clone(),
                    $( $list: self.$list.clone(), )+
                    $( $single: self.$single.clone(), )+
                }
            }
        }
    };
}

services! {
    lists {
        goals: Goal,
        planned_actions: PlannedAction,
        bank_accounts: BankAccount,
        securities: SecurityHolding,
        real_estate: RealEstate,
        other_assets: OtherAsset,
        liabilities: Liability,
        pillar3_accounts: Pillar3Account,
        life_insurance: LifeInsurance,
        income_details: IncomeDetail,
    }
    singles {
        housing: Housing,
        property_insurance: PropertyInsurance,
        health_insurance: HealthInsurance,
        legal_security: LegalSecurity,
        tax_optimization: TaxOptimization,
        investment: Investment,
        pension: Pension,
        budget: Budget,
        preferences: ClientPreferences,
        pillar1: Pillar1,
        pillar2: Pillar2,
        risk_profile: RiskProfile,
    }
}
