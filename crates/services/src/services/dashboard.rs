//! Contents of the landing page. Figures are placeholders; no query runs.

use chrono::NaiveDateTime;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Neutral,
    Down,
}

#[derive(Debug, Clone, Serialize, TS)]
pub struct StatCard {
    pub title: &'static str,
    pub value: &'static str,
    pub change: &'static str,
    pub trend: Trend,
}

#[derive(Debug, Clone, Serialize, TS)]
pub struct ActivityItem {
    pub title: &'static str,
    pub detail: &'static str,
}

#[derive(Debug, Clone, Serialize, TS)]
pub struct QuickAction {
    pub title: &'static str,
    pub description: &'static str,
    pub href: &'static str,
}

#[derive(Debug, Clone, Serialize, TS)]
pub struct Dashboard {
    pub heading: &'static str,
    pub subtitle: &'static str,
    /// "dd/mm/yyyy às HH:MM"
    pub updated_at: String,
    pub stats: Vec<StatCard>,
    pub recent_activity: Vec<ActivityItem>,
    pub quick_actions: Vec<QuickAction>,
}

impl Dashboard {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            heading: "Bem-vindo ao AMA",
            subtitle: "Painel de gestão da Associação dos Músicos Araguatinenses",
            updated_at: now.format("%d/%m/%Y às %H:%M").to_string(),
            stats: vec![
                StatCard {
                    title: "Total de Associados",
                    value: "142",
                    change: "+5 este mês",
                    trend: Trend::Up,
                },
                StatCard {
                    title: "Receita Mensal",
                    value: "R$ 12.450",
                    change: "+12% vs mês anterior",
                    trend: Trend::Up,
                },
                StatCard {
                    title: "Contribuições em Dia",
                    value: "87%",
                    change: "125 de 142 associados",
                    trend: Trend::Neutral,
                },
                StatCard {
                    title: "Crescimento Anual",
                    value: "+24%",
                    change: "Meta: 20%",
                    trend: Trend::Up,
                },
            ],
            recent_activity: vec![
                ActivityItem {
                    title: "Novo associado registrado",
                    detail: "João Silva - Violonista • Há 2 horas",
                },
                ActivityItem {
                    title: "Contribuição recebida",
                    detail: "Maria Santos - R$ 150,00 • Há 4 horas",
                },
                ActivityItem {
                    title: "Documento atualizado",
                    detail: "Regulamento 2024 • Há 1 dia",
                },
            ],
            quick_actions: vec![
                QuickAction {
                    title: "Cadastrar Novo Associado",
                    description: "Adicionar membro à associação",
                    href: "/associados/new",
                },
                QuickAction {
                    title: "Registrar Contribuição",
                    description: "Lançar pagamento de associado",
                    href: "/contribuicoes/new",
                },
                QuickAction {
                    title: "Gerar Relatório",
                    description: "Exportar dados financeiros",
                    href: "/financeiro",
                },
            ],
        }
    }
}
