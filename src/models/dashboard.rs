// src/models/dashboard.rs

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{
    activity::ActivityLog,
    client::Client,
    project::{Project, ProjectStatus},
};

// Os cards do topo + atividade recente
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    #[schema(value_type = f64)]
    pub total_revenue: Decimal, // Soma dos totais de todos os projetos
    pub total_clients: usize,
    pub active_clients: usize, // Clientes com pelo menos um projeto
    pub completed_projects: usize,
    pub pending_projects: usize, // Em andamento ou planejados
    pub pending_payments_count: usize,
    #[schema(value_type = f64)]
    pub pending_payments_amount: Decimal,
    pub recent_activity: Vec<ActivityLog>,
}

impl DashboardSummary {
    pub fn from_records(clients: &[Client], projects: &[Project], recent_activity: Vec<ActivityLog>) -> Self {
        let active_clients: HashSet<_> = projects.iter().map(|p| p.client_id).collect();
        let pending_payments: Vec<&Project> = projects
            .iter()
            .filter(|p| p.remaining_amount > Decimal::ZERO)
            .collect();

        Self {
            total_revenue: projects.iter().map(|p| p.total_amount).sum(),
            total_clients: clients.len(),
            active_clients: active_clients.len(),
            completed_projects: projects
                .iter()
                .filter(|p| p.status == ProjectStatus::Completed)
                .count(),
            pending_projects: projects
                .iter()
                .filter(|p| matches!(p.status, ProjectStatus::InProgress | ProjectStatus::Planned))
                .count(),
            pending_payments_count: pending_payments.len(),
            pending_payments_amount: pending_payments.iter().map(|p| p.remaining_amount).sum(),
            recent_activity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::tests::sample_project;
    use uuid::Uuid;

    #[test]
    fn aggregates_projects() {
        let owner = Uuid::new_v4();

        let mut paid = sample_project("Site", 1000, 1000);
        paid.status = ProjectStatus::Completed;
        paid.client_id = owner;

        let mut running = sample_project("App", 3000, 500);
        running.status = ProjectStatus::InProgress;
        running.client_id = owner;

        let mut held = sample_project("Logo", 200, 0);
        held.status = ProjectStatus::OnHold;
        held.client_id = Uuid::new_v4();

        let summary = DashboardSummary::from_records(&[], &[paid, running, held], Vec::new());

        assert_eq!(summary.total_revenue, Decimal::from(4200));
        assert_eq!(summary.active_clients, 2);
        assert_eq!(summary.completed_projects, 1);
        assert_eq!(summary.pending_projects, 1);
        assert_eq!(summary.pending_payments_count, 2);
        assert_eq!(summary.pending_payments_amount, Decimal::from(2700));
    }

    #[test]
    fn empty_dashboard_is_zeroed() {
        let summary = DashboardSummary::from_records(&[], &[], Vec::new());
        assert_eq!(summary.total_revenue, Decimal::ZERO);
        assert_eq!(summary.pending_payments_count, 0);
    }
}
