use crate::error::IngestionError;
use crate::sheet::{Sheet, SheetRow};
use crate::values::{parse_calendar_date, parse_decimal};
use configuration::{ColumnLayout, IngestionConfig};
use core_types::RawOperation;
use rust_decimal::Decimal;
use serde::Serialize;

/// Why a data row was left out of the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    InvalidDate,
    MissingResult,
    InvalidQuantity,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            SkipReason::InvalidDate => "open date missing or unreadable",
            SkipReason::MissingResult => "operation result missing or unreadable",
            SkipReason::InvalidQuantity => "quantity unreadable",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRow {
    /// 1-based line in the uploaded file.
    pub line: usize,
    pub reason: SkipReason,
}

/// The typed data rows of one export plus an account of the ones left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedOperations {
    pub operations: Vec<RawOperation>,
    pub skipped: Vec<SkippedRow>,
    /// Non-blank rows found after the header.
    pub rows_read: usize,
}

/// Reads the operations table out of a brokerage export sheet.
#[derive(Debug, Clone)]
pub struct OperationsImporter {
    sentinel: String,
    columns: ColumnLayout,
    max_rows: usize,
}

impl OperationsImporter {
    pub fn new(config: &IngestionConfig) -> Self {
        Self {
            sentinel: config.sentinel.trim().to_string(),
            columns: config.columns.clone(),
            max_rows: config.max_rows,
        }
    }

    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    /// Extracts every data row following the sentinel header row.
    ///
    /// Rows before and including the header are ignored. A data row that lacks
    /// a usable date or result is skipped and recorded, never failing the batch;
    /// a sheet without the header fails as a whole.
    pub fn import(&self, sheet: &Sheet) -> Result<ImportedOperations, IngestionError> {
        let header = sheet
            .rows
            .iter()
            .position(|row| row.cell(0) == self.sentinel)
            .ok_or_else(|| IngestionError::MalformedInputFormat {
                sentinel: self.sentinel.clone(),
            })?;

        let data_rows: Vec<&SheetRow> = sheet.rows[header + 1..]
            .iter()
            .filter(|row| !row.is_blank())
            .collect();

        if data_rows.len() > self.max_rows {
            return Err(IngestionError::RowLimitExceeded {
                found: data_rows.len(),
                limit: self.max_rows,
            });
        }

        let mut imported = ImportedOperations {
            operations: Vec::with_capacity(data_rows.len()),
            skipped: Vec::new(),
            rows_read: data_rows.len(),
        };

        for row in data_rows {
            match self.parse_row(row) {
                Ok(operation) => imported.operations.push(operation),
                Err(reason) => {
                    tracing::debug!(line = row.line, %reason, "Skipping export row.");
                    imported.skipped.push(SkippedRow {
                        line: row.line,
                        reason,
                    });
                }
            }
        }

        if !imported.skipped.is_empty() {
            tracing::warn!(
                skipped = imported.skipped.len(),
                rows = imported.rows_read,
                "Some export rows could not be used."
            );
        }
        Ok(imported)
    }

    fn parse_row(&self, row: &SheetRow) -> Result<RawOperation, SkipReason> {
        let open_date =
            parse_calendar_date(row.cell(self.columns.open_date)).ok_or(SkipReason::InvalidDate)?;
        let operation_result =
            parse_decimal(row.cell(self.columns.result)).ok_or(SkipReason::MissingResult)?;

        Ok(RawOperation {
            asset: row.cell(self.columns.asset).to_string(),
            open_date,
            buy_quantity: parse_quantity(row.cell(self.columns.buy_quantity))?,
            sell_quantity: parse_quantity(row.cell(self.columns.sell_quantity))?,
            operation_result,
        })
    }
}

/// An empty quantity cell means that leg was not traded.
fn parse_quantity(cell: &str) -> Result<Decimal, SkipReason> {
    if cell.is_empty() || cell == "-" {
        return Ok(Decimal::ZERO);
    }
    parse_decimal(cell).ok_or(SkipReason::InvalidQuantity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    const HEADER: [&str; 15] = [
        "Subconta",
        "Ativo",
        "Abertura",
        "Fechamento",
        "Tempo Operação",
        "Qtd Compra",
        "Qtd Venda",
        "Lado",
        "Preço Compra",
        "Preço Venda",
        "Preço de Mercado",
        "Res. Intervalo",
        "Res. Intervalo (%)",
        "Número Operação",
        "Res. Operação",
    ];

    fn data_row(asset: &str, open: &str, buy: &str, sell: &str, result: &str) -> Vec<String> {
        let mut row = vec![String::new(); 15];
        row[0] = "1".to_string();
        row[1] = asset.to_string();
        row[2] = open.to_string();
        row[5] = buy.to_string();
        row[6] = sell.to_string();
        row[14] = result.to_string();
        row
    }

    fn header() -> Vec<String> {
        HEADER.iter().map(|c| c.to_string()).collect()
    }

    fn importer() -> OperationsImporter {
        OperationsImporter::new(&IngestionConfig::default())
    }

    #[test]
    fn reads_rows_after_the_sentinel_header() {
        let sheet = Sheet::from_rows(vec![
            vec!["Relatório de Operações".to_string()],
            vec!["Conta".to_string(), "12345".to_string()],
            header(),
            data_row("WINZ24", "04/11/2024 09:15:02", "2", "2", "100,00"),
            data_row("WDOZ24", "04/11/2024 10:01:44", "1", "", "-40,00"),
        ]);

        let imported = importer().import(&sheet).unwrap();
        assert_eq!(imported.rows_read, 2);
        assert!(imported.skipped.is_empty());
        assert_eq!(
            imported.operations[1],
            RawOperation {
                asset: "WDOZ24".to_string(),
                open_date: NaiveDate::from_ymd_opt(2024, 11, 4).unwrap(),
                buy_quantity: dec!(1),
                sell_quantity: Decimal::ZERO,
                operation_result: dec!(-40),
            }
        );
    }

    #[test]
    fn missing_sentinel_fails_the_whole_sheet() {
        let sheet = Sheet::from_rows(vec![
            vec!["Ativo".to_string(), "Abertura".to_string()],
            data_row("WINZ24", "04/11/2024", "1", "1", "10"),
        ]);
        let err = importer().import(&sheet).unwrap_err();
        assert!(matches!(err, IngestionError::MalformedInputFormat { ref sentinel } if sentinel == "Subconta"));
    }

    #[test]
    fn unusable_rows_are_skipped_and_counted() {
        let sheet = Sheet::from_rows(vec![
            header(),
            data_row("WINZ24", "not a date", "1", "1", "10"),
            data_row("WINZ24", "05/11/2024", "1", "1", ""),
            data_row("WINZ24", "05/11/2024", "lots", "1", "5"),
            vec![String::new(); 15],
            data_row("WINZ24", "05/11/2024", "1", "1", "25,50"),
        ]);

        let imported = importer().import(&sheet).unwrap();
        assert_eq!(imported.rows_read, 4);
        assert_eq!(imported.operations.len(), 1);
        assert_eq!(imported.operations[0].operation_result, dec!(25.50));
        assert_eq!(
            imported.skipped,
            vec![
                SkippedRow { line: 2, reason: SkipReason::InvalidDate },
                SkippedRow { line: 3, reason: SkipReason::MissingResult },
                SkippedRow { line: 4, reason: SkipReason::InvalidQuantity },
            ]
        );
    }

    #[test]
    fn oversized_exports_are_rejected() {
        let mut config = IngestionConfig::default();
        config.max_rows = 2;
        let importer = OperationsImporter::new(&config);

        let mut rows = vec![header()];
        for _ in 0..3 {
            rows.push(data_row("WINZ24", "05/11/2024", "1", "1", "1"));
        }
        let err = importer.import(&Sheet::from_rows(rows)).unwrap_err();
        assert!(matches!(err, IngestionError::RowLimitExceeded { found: 3, limit: 2 }));
    }

    #[test]
    fn honours_a_custom_column_layout() {
        let mut config = IngestionConfig::default();
        config.sentinel = "Conta".to_string();
        config.columns = ColumnLayout {
            asset: 1,
            open_date: 2,
            buy_quantity: 3,
            sell_quantity: 4,
            result: 5,
        };
        let sheet = Sheet::from_rows(vec![
            vec!["Conta", "Ativo", "Data", "C", "V", "Res"],
            vec!["9", "WDOF25", "2025-01-02", "3", "3", "12.5"],
        ]);
        let imported = OperationsImporter::new(&config).import(&sheet).unwrap();
        assert_eq!(imported.operations[0].asset, "WDOF25");
        assert_eq!(imported.operations[0].operation_result, dec!(12.5));
    }

    #[test]
    fn reads_a_delimited_export_end_to_end() {
        let content = "\
Relatório de Operações;;;
Subconta;Ativo;Abertura;Fechamento;Tempo Operação;Qtd Compra;Qtd Venda;Lado;Preço Compra;Preço Venda;Preço de Mercado;Res. Intervalo;Res. Intervalo (%);Número Operação;Res. Operação
1;WINZ24;04/11/2024 09:15;04/11/2024 09:20;5min;2;2;C;130.000;130.100;130.100;40,00;0,1;1;40,00
1;WINZ24;xx;;;1;1;V;;;;;;2;10,00
";
        let sheet =
            crate::read_sheet(content.as_bytes(), configuration::Delimiter::Auto, "Subconta")
                .unwrap();
        let imported = importer().import(&sheet).unwrap();
        assert_eq!(imported.operations.len(), 1);
        assert_eq!(imported.operations[0].operation_result, dec!(40));
        assert_eq!(imported.operations[0].buy_quantity, dec!(2));
        assert_eq!(imported.skipped[0].line, 4);
    }

    #[test]
    fn reads_an_excel_export_end_to_end() {
        let content = include_bytes!("../tests/fixtures/operations.xlsx");
        let sheet = crate::read_sheet(content, configuration::Delimiter::Auto, "Subconta").unwrap();
        let imported = importer().import(&sheet).unwrap();

        assert_eq!(imported.rows_read, 2);
        assert!(imported.skipped.is_empty());
        assert_eq!(
            imported.operations,
            vec![
                RawOperation {
                    asset: "WINZ24".to_string(),
                    open_date: NaiveDate::from_ymd_opt(2024, 11, 4).unwrap(),
                    buy_quantity: dec!(2),
                    sell_quantity: dec!(2),
                    operation_result: dec!(150.5),
                },
                RawOperation {
                    asset: "WDOZ24".to_string(),
                    open_date: NaiveDate::from_ymd_opt(2024, 11, 5).unwrap(),
                    buy_quantity: dec!(1),
                    sell_quantity: Decimal::ZERO,
                    operation_result: dec!(-40.25),
                },
            ]
        );
    }
}
