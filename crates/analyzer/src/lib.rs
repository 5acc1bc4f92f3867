use analytics::{DailyAggregator, Evaluation, PerformanceEvaluator};
use configuration::{Config, Delimiter};
use core_types::{Client, GoalAmount};
use database::ClientRepository;
use ingestion::{read_sheet, OperationsImporter};
use risk::CostModel;
use rust_decimal::Decimal;
use std::sync::Arc;

pub mod error;
pub mod report;

pub use error::AnalyzerError;
pub use report::{AnalysisResult, IngestionSummary};

/// One analysis request as received from the desk.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Raw bytes of the brokerage operations export.
    pub file: Vec<u8>,
    pub client_id: String,
    /// Profit goal in currency units.
    pub goal: Decimal,
}

/// The operations analyst: export in, verdict out.
///
/// Holds only immutable policy and a shared client directory, so one instance
/// serves any number of concurrent requests.
#[derive(Clone)]
pub struct Analyzer {
    delimiter: Delimiter,
    importer: OperationsImporter,
    aggregator: DailyAggregator,
    evaluator: PerformanceEvaluator,
    clients: Arc<dyn ClientRepository>,
}

impl Analyzer {
    pub fn new(config: &Config, clients: Arc<dyn ClientRepository>) -> Result<Self, AnalyzerError> {
        let cost_model = CostModel::new(&config.cost_model)?;
        Ok(Self {
            delimiter: config.ingestion.delimiter,
            importer: OperationsImporter::new(&config.ingestion),
            aggregator: DailyAggregator::new(cost_model),
            evaluator: PerformanceEvaluator::from_policy(&config.risk_policy)?,
            clients,
        })
    }

    /// Overrides the configured export delimiter.
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Validates the request, evaluates the export and attaches client metadata.
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult, AnalyzerError> {
        let client_id = request.client_id.trim();
        if client_id.is_empty() {
            return Err(AnalyzerError::InvalidRequest("clientId is required".to_string()));
        }
        if request.file.is_empty() {
            return Err(AnalyzerError::InvalidRequest("file is required".to_string()));
        }
        let goal = GoalAmount::new(request.goal)
            .map_err(|e| AnalyzerError::InvalidRequest(e.to_string()))?;

        let (evaluation, ingestion) = self.evaluate_export(&request.file, goal)?;
        let client = self.resolve_client(client_id).await;

        tracing::info!(
            client_id,
            days_operated = evaluation.metrics.days_operated,
            total_net_result = %evaluation.metrics.total_net_result,
            approved = evaluation.validation.approved,
            violations = evaluation.violations.len(),
            warnings = evaluation.warnings.len(),
            rows_skipped = ingestion.rows_skipped,
            "Analysis complete."
        );

        Ok(AnalysisResult {
            client,
            metrics: evaluation.metrics,
            validation: evaluation.validation,
            violations: evaluation.violations,
            warnings: evaluation.warnings,
            ingestion,
        })
    }

    /// The pure part of an analysis: parse, aggregate and evaluate one export.
    pub fn evaluate_export(
        &self,
        content: &[u8],
        goal: GoalAmount,
    ) -> Result<(Evaluation, IngestionSummary), AnalyzerError> {
        let sheet = read_sheet(content, self.delimiter, self.importer.sentinel())?;
        let imported = self.importer.import(&sheet)?;
        let aggregates = self
            .aggregator
            .aggregate(&imported.operations)
            .map_err(AnalyzerError::Evaluation)?;
        let evaluation = self
            .evaluator
            .evaluate(&aggregates, goal)
            .map_err(AnalyzerError::Evaluation)?;

        let summary = IngestionSummary {
            rows_read: imported.rows_read,
            rows_used: imported.operations.len(),
            rows_skipped: imported.skipped.len(),
            skipped: imported.skipped,
        };
        Ok((evaluation, summary))
    }

    /// Looks the client up, substituting placeholder metadata when the record is
    /// missing or the directory is unreachable. The verdict does not depend on it.
    async fn resolve_client(&self, client_id: &str) -> Client {
        match self.clients.find_client(client_id).await {
            Ok(Some(client)) => client,
            Ok(None) => {
                tracing::warn!(client_id, "Client not found, using placeholder metadata.");
                Client::placeholder(client_id)
            }
            Err(e) => {
                tracing::error!(client_id, error = %e, "Client lookup failed, using placeholder metadata.");
                Client::placeholder(client_id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::AnalyticsError;
    use async_trait::async_trait;
    use core_types::RiskLevel;
    use database::{DbError, InMemoryClientRepository};
    use ingestion::{IngestionError, SkipReason};
    use rust_decimal_macros::dec;

    const HEADER: &str = "Subconta;Ativo;Abertura;Fechamento;Tempo Operação;Qtd Compra;Qtd Venda;Lado;Preço Compra;Preço Venda;Preço de Mercado;Res. Intervalo;Res. Intervalo (%);Número Operação;Res. Operação";

    /// One export line per (day of month, asset, contracts, result).
    fn export(rows: &[(u32, &str, u32, &str)]) -> Vec<u8> {
        let mut lines = vec![
            "Relatório de Operações - Conta 778899".to_string(),
            String::new(),
            HEADER.to_string(),
        ];
        for (n, (day, asset, qty, result)) in rows.iter().enumerate() {
            lines.push(format!(
                "1;{asset};{day:02}/08/2024 10:{min:02}:00;{day:02}/08/2024 10:{min:02}:30;30s;{qty};{qty};C;;;;;;{n};{result}",
                min = n % 60,
            ));
        }
        lines.join("\n").into_bytes()
    }

    fn client() -> Client {
        Client {
            id: "42".to_string(),
            name: "Carla Menezes".to_string(),
            cpf: "987.654.321-00".to_string(),
            plan: "25K".to_string(),
            platform: "Profit Pro".to_string(),
        }
    }

    fn analyzer() -> Analyzer {
        let clients = Arc::new(InMemoryClientRepository::new(vec![client()]));
        Analyzer::new(&Config::default(), clients).unwrap()
    }

    fn request(file: Vec<u8>, client_id: &str, goal: Decimal) -> AnalysisRequest {
        AnalysisRequest {
            file,
            client_id: client_id.to_string(),
            goal,
        }
    }

    #[tokio::test]
    async fn approves_a_consistent_trader() {
        // Ten days, each +150.50 gross on 2 WIN contracts (0.50 cost) => +150 net.
        let rows: Vec<_> = (1..=10).map(|day| (day, "WINU24", 2, "150,50")).collect();
        let result = analyzer()
            .analyze(request(export(&rows), "42", dec!(1000)))
            .await
            .unwrap();

        assert_eq!(result.client, client());
        assert_eq!(result.metrics.days_operated, 10);
        assert_eq!(result.metrics.total_result, dec!(1505));
        assert_eq!(result.metrics.total_costs, dec!(5));
        assert_eq!(result.metrics.total_net_result, dec!(1500));
        assert!(result.metrics.daily_results.iter().all(|d| d.percent_of_goal == dec!(15)));
        assert!(result.validation.approved);
        assert!(result.violations.is_empty() && result.warnings.is_empty());
        assert_eq!(result.ingestion.rows_used, 10);
    }

    #[tokio::test]
    async fn one_violation_day_rejects_a_profitable_trader() {
        let mut rows: Vec<_> = (1..=11).map(|day| (day, "PETR4", 100, "200,00")).collect();
        rows.push((12, "PETR4", 100, "-400,00"));
        let result = analyzer()
            .analyze(request(export(&rows), "42", dec!(1000)))
            .await
            .unwrap();

        assert_eq!(result.metrics.days_operated, 12);
        assert!(result.validation.total_goal_reached);
        assert!(!result.validation.daily_limit_respected);
        assert!(!result.validation.approved);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].kind, RiskLevel::Violation);
        assert_eq!(result.violations[0].percent_of_goal, dec!(40));
    }

    #[tokio::test]
    async fn several_operations_on_one_day_count_once() {
        let mut rows = Vec::new();
        for day in 1..=8 {
            rows.push((day, "WDOU24", 1, "100,00"));
            rows.push((day, "WDOU24", 1, "100,00"));
        }
        let result = analyzer()
            .analyze(request(export(&rows), "42", dec!(1000)))
            .await
            .unwrap();

        assert_eq!(result.metrics.days_operated, 8);
        assert_eq!(result.metrics.daily_results[0].operations, 2);
        assert!(!result.validation.minimum_days);
        assert!(result.validation.total_goal_reached);
        assert!(!result.validation.approved);
    }

    #[tokio::test]
    async fn unknown_clients_get_placeholder_metadata() {
        let rows = vec![(1, "WINU24", 1, "10,00")];
        let result = analyzer()
            .analyze(request(export(&rows), "nobody", dec!(1000)))
            .await
            .unwrap();
        assert_eq!(result.client, Client::placeholder("nobody"));
        assert_eq!(result.metrics.days_operated, 1);
    }

    struct UnreachableDirectory;

    #[async_trait]
    impl ClientRepository for UnreachableDirectory {
        async fn find_client(&self, _id: &str) -> Result<Option<Client>, DbError> {
            Err(DbError::ConnectionConfigError("offline".to_string()))
        }
    }

    #[tokio::test]
    async fn directory_failures_do_not_fail_the_analysis() {
        let analyzer = Analyzer::new(&Config::default(), Arc::new(UnreachableDirectory)).unwrap();
        let rows = vec![(1, "WINU24", 1, "10,00")];
        let result = analyzer
            .analyze(request(export(&rows), "42", dec!(1000)))
            .await
            .unwrap();
        assert_eq!(result.client.name, "Unknown client");
    }

    #[tokio::test]
    async fn missing_sentinel_rejects_without_partial_results() {
        let file = b"Ativo;Abertura;Resultado\nWINU24;01/08/2024;10\n".to_vec();
        let err = analyzer()
            .analyze(request(file, "42", dec!(1000)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::Ingestion(IngestionError::MalformedInputFormat { .. })
        ));
    }

    #[tokio::test]
    async fn invalid_requests_are_rejected_before_parsing() {
        let analyzer = analyzer();
        let file = export(&[(1, "WINU24", 1, "10,00")]);

        for (file, client_id, goal) in [
            (file.clone(), "42", dec!(0)),
            (file.clone(), "42", dec!(-5)),
            (file.clone(), "  ", dec!(1000)),
            (Vec::new(), "42", dec!(1000)),
        ] {
            let err = analyzer
                .analyze(request(file, client_id, goal))
                .await
                .unwrap_err();
            assert!(matches!(err, AnalyzerError::InvalidRequest(_)), "{err}");
        }
    }

    #[tokio::test]
    async fn out_of_range_percentages_are_rejected_not_panicked_on() {
        let file = export(&[(1, "WINU24", 1, "1000,00")]);
        let err = analyzer()
            .analyze(request(file, "42", dec!(0.0000000000000000000000000001)))
            .await
            .unwrap_err();
        assert!(
            matches!(
                err,
                AnalyzerError::Evaluation(AnalyticsError::OutOfRange { .. })
            ),
            "{err}"
        );
    }

    #[tokio::test]
    async fn skipped_rows_are_reported() {
        let mut file = export(&[(1, "WINU24", 1, "10,00"), (2, "WINU24", 1, "")]);
        file.extend_from_slice(b"\n1;WINU24;someday;;;1;1;C;;;;;;9;5,00");
        let result = analyzer()
            .analyze(request(file, "42", dec!(1000)))
            .await
            .unwrap();

        assert_eq!(result.ingestion.rows_read, 3);
        assert_eq!(result.ingestion.rows_used, 1);
        assert_eq!(result.ingestion.rows_skipped, 2);
        let reasons: Vec<_> = result.ingestion.skipped.iter().map(|s| s.reason).collect();
        assert_eq!(reasons, vec![SkipReason::MissingResult, SkipReason::InvalidDate]);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["ingestion"]["rowsSkipped"], 2);
        assert_eq!(json["client"]["cpf"], "987.654.321-00");
    }
}
