// CSV ingestion and DynamoDB load
//
// Takes a learning-management CSV export and writes one item per person row
// to DynamoDB. Writes go through the aws CLI like every other external tool,
// batched at the batch-write-item limit.

use crate::config::DynamoConfig;
use crate::error::{BootstrapError, Result};
use crate::runner::{CommandRunner, CommandSpec};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;

/// DynamoDB caps batch-write-item at 25 put requests.
const BATCH_SIZE: usize = 25;

/// Upper bound on items written in a single run.
const MAX_ITEMS: usize = 5000;

/// Operator guidance for DynamoDB error codes, matched against the CLI's
/// stderr when a batch write fails.
const ERROR_HELP: &[(&str, &str)] = &[
    (
        "ConditionalCheckFailedException",
        "Condition check specified in the operation failed, review and update the condition check before retrying",
    ),
    (
        "TransactionConflictException",
        "Operation was rejected because there is an ongoing transaction for the item, generally safe to retry with exponential back-off",
    ),
    (
        "ItemCollectionSizeLimitExceededException",
        "An item collection is too large; consider a Global Secondary Index instead of a Local Secondary Index",
    ),
    (
        "AccessDeniedException",
        "Configure identity based access before retrying",
    ),
    (
        "InternalServerError",
        "Internal Server Error, generally safe to retry with exponential back-off",
    ),
    (
        "ProvisionedThroughputExceededException",
        "Request rate is too high; retry with exponential back-off or increase provisioned capacity for the table or index",
    ),
    (
        "ResourceNotFoundException",
        "One of the tables was not found, verify the table exists before retrying",
    ),
    (
        "ServiceUnavailable",
        "Had trouble reaching DynamoDB, generally safe to retry with exponential back-off",
    ),
    (
        "ThrottlingException",
        "Request denied due to throttling, generally safe to retry with exponential back-off",
    ),
    (
        "UnrecognizedClientException",
        "The request signature is incorrect, most likely an invalid AWS access key ID or secret key",
    ),
    (
        "ValidationException",
        "The input fails to satisfy the constraints specified by DynamoDB, fix the input before retrying",
    ),
    (
        "RequestLimitExceeded",
        "Throughput exceeds the current limit for your account, increase account level throughput before retrying",
    ),
];

/// Look up the help string for a known DynamoDB error code in CLI stderr.
pub fn error_help(stderr: &str) -> Option<(&'static str, &'static str)> {
    ERROR_HELP
        .iter()
        .find(|(code, _)| stderr.contains(code))
        .copied()
}

/// One row of the CSV export, keyed by the export's column names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignmentRow {
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "ActivityIDSource")]
    pub activity_id: String,
    #[serde(rename = "SourceIDEmpPk")]
    pub calnet_uid: String,
    #[serde(rename = "LocalEmployeeID")]
    pub empl_id: String,
    #[serde(rename = "EmpFullName1")]
    pub full_name: String,
    #[serde(rename = "FirstName")]
    pub given_name: String,
    #[serde(rename = "LastName")]
    pub family_name: String,
    #[serde(rename = "UserPrimaryOrganizationCode")]
    pub org_code: String,
    #[serde(rename = "ManagerLocalEmployeeID")]
    pub manager_empl_id: String,
    #[serde(rename = "ActivityCode")]
    pub activity_code: String,
    #[serde(rename = "ActivityName")]
    pub activity_name: String,
    #[serde(rename = "AssignmentStatus")]
    pub assignment_status: String,
    #[serde(rename = "UCRequirementStatus")]
    pub requirement_status: String,
    #[serde(rename = "PlanDate")]
    pub assigned_date: String,
    #[serde(rename = "DueDate")]
    pub due_date: String,
    #[serde(rename = "ExpirationDate")]
    pub expiration_date: String,
    #[serde(rename = "AttemptEndDate")]
    pub last_attempt_date: String,
    #[serde(rename = "LastCompletionDateRealtime")]
    pub last_completion_date: String,
}

/// Export dates are "%m/%d/%y"; stored dates are ISO-8601. Empty stays empty.
fn convert_date(raw: &str) -> Result<String> {
    if raw.is_empty() {
        return Ok(String::new());
    }
    let date = NaiveDate::parse_from_str(raw, "%m/%d/%y")
        .map_err(|_| BootstrapError::DataLoad(format!("invalid date '{}'", raw)))?;
    Ok(format!("{}T00:00:00", date.format("%Y-%m-%d")))
}

/// Empty employee/manager IDs are stored as the literal string "null".
fn convert_nullable(raw: &str) -> String {
    if raw.is_empty() {
        "null".to_string()
    } else {
        raw.to_string()
    }
}

/// Org codes carry a "01HD" campus prefix the table does without.
fn convert_org_code(raw: &str) -> String {
    raw.replace("01HD", "")
}

/// Build a DynamoDB item (wire-format attribute map) from a row.
///
/// Returns None for rows that do not represent a person: only usernames that
/// are bare positive integers are loaded.
fn build_item(row: &AssignmentRow, updated_at: &str) -> Result<Option<Value>> {
    if row.username.is_empty() || !row.username.chars().all(|c| c.is_ascii_digit()) {
        return Ok(None);
    }

    let lms_user_id: u64 = row
        .username
        .parse()
        .map_err(|_| BootstrapError::DataLoad(format!("invalid Username '{}'", row.username)))?;
    let activity_id: u64 = row.activity_id.parse().map_err(|_| {
        BootstrapError::DataLoad(format!("invalid ActivityIDSource '{}'", row.activity_id))
    })?;

    Ok(Some(json!({
        "lms_user_id": {"N": lms_user_id.to_string()},
        "activity_id": {"N": activity_id.to_string()},
        "calnet_uid": {"S": row.calnet_uid},
        "empl_id": {"S": convert_nullable(&row.empl_id)},
        "full_name": {"S": row.full_name},
        "given_name": {"S": row.given_name},
        "family_name": {"S": row.family_name},
        "empl_org_code": {"S": convert_org_code(&row.org_code)},
        "manager_empl_id": {"S": convert_nullable(&row.manager_empl_id)},
        "activity_code": {"S": row.activity_code},
        "activity_name": {"S": row.activity_name},
        "is_required": {"BOOL": row.assignment_status == "Required"},
        "assignment_status": {"S": row.requirement_status},
        "assigned_date": {"S": convert_date(&row.assigned_date)?},
        "due_date": {"S": convert_date(&row.due_date)?},
        "expiration_date": {"S": convert_date(&row.expiration_date)?},
        "last_attempt_date": {"S": convert_date(&row.last_attempt_date)?},
        "last_completion_date": {"S": convert_date(&row.last_completion_date)?},
        "last_updated_datetime": {"S": updated_at},
        "last_updated_event_id": {"N": "0"}
    })))
}

/// Outcome of a finished load.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub items_written: usize,
    pub rows_skipped: usize,
    pub elapsed_seconds: i64,
}

/// Load person rows from the CSV file into the configured table.
///
/// Rows that fail conversion are logged and skipped; a failed batch write is
/// terminal. At most MAX_ITEMS items are written per run.
pub fn load_csv(
    runner: &dyn CommandRunner,
    dynamo: &DynamoConfig,
    file: &Path,
) -> Result<LoadReport> {
    let started = chrono::Utc::now();
    let updated_at = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string();

    let mut reader = csv::Reader::from_path(file)?;

    let mut batch: Vec<Value> = Vec::new();
    let mut items_written = 0usize;
    let mut rows_skipped = 0usize;

    for record in reader.deserialize::<AssignmentRow>() {
        let row = record?;

        match build_item(&row, &updated_at) {
            Ok(Some(item)) => {
                batch.push(item);
                if batch.len() == BATCH_SIZE {
                    write_batch(runner, dynamo, &batch)?;
                    items_written += batch.len();
                    batch.clear();
                    if items_written % 100 == 0 {
                        tracing::debug!("Loaded {} items", items_written);
                    }
                }
            }
            Ok(None) => rows_skipped += 1,
            Err(e) => {
                tracing::warn!("Skipping row: {}", e);
                rows_skipped += 1;
            }
        }

        if items_written + batch.len() >= MAX_ITEMS {
            tracing::info!("Reached the {} item cap, stopping", MAX_ITEMS);
            break;
        }
    }

    if !batch.is_empty() {
        write_batch(runner, dynamo, &batch)?;
        items_written += batch.len();
    }

    let elapsed_seconds = (chrono::Utc::now() - started).num_seconds();
    tracing::info!(
        "Loaded {} items into {} in {}s ({} rows skipped)",
        items_written,
        dynamo.table,
        elapsed_seconds,
        rows_skipped
    );

    Ok(LoadReport {
        items_written,
        rows_skipped,
        elapsed_seconds,
    })
}

fn write_batch(runner: &dyn CommandRunner, dynamo: &DynamoConfig, items: &[Value]) -> Result<()> {
    let puts: Vec<Value> = items
        .iter()
        .map(|item| json!({"PutRequest": {"Item": item}}))
        .collect();

    let mut request = serde_json::Map::new();
    request.insert(dynamo.table.clone(), Value::Array(puts));
    let payload = Value::Object(request).to_string();

    let spec = CommandSpec::new("aws")
        .args(["dynamodb", "batch-write-item", "--region"])
        .arg(&dynamo.region)
        .arg("--request-items")
        .arg(payload)
        .quiet();

    let output = runner
        .run(&spec)
        .map_err(|e| BootstrapError::DataLoad(e.to_string()))?;

    if !output.success {
        if let Some((code, help)) = error_help(&output.stderr) {
            tracing::error!("[{}] {}", code, help);
        }
        return Err(BootstrapError::DataLoad(format!(
            "batch write failed: {}",
            output.stderr
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{CommandOutput, MockCommandRunner};
    use std::fs;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    const HEADER: &str = "Username,ActivityIDSource,SourceIDEmpPk,LocalEmployeeID,EmpFullName1,\
        FirstName,LastName,UserPrimaryOrganizationCode,ManagerLocalEmployeeID,ActivityCode,\
        ActivityName,AssignmentStatus,UCRequirementStatus,PlanDate,DueDate,ExpirationDate,\
        AttemptEndDate,LastCompletionDateRealtime";

    fn person_row(username: &str) -> String {
        format!(
            "{},4711,CAL1,E100,\"Doe, Jane\",Jane,Doe,01HD1234,,SAF-101,Lab Safety,\
             Required,Completed,05/01/24,06/01/24,,05/20/24,05/20/24",
            username
        )
    }

    fn write_csv(dir: &Path, rows: &[String]) -> PathBuf {
        let file = dir.join("assignments.csv");
        let mut contents = String::from(HEADER);
        for row in rows {
            contents.push('\n');
            contents.push_str(row);
        }
        contents.push('\n');
        fs::write(&file, contents).unwrap();
        file
    }

    fn sample_row() -> AssignmentRow {
        AssignmentRow {
            username: "123".to_string(),
            activity_id: "4711".to_string(),
            calnet_uid: "CAL1".to_string(),
            empl_id: "E100".to_string(),
            full_name: "Doe, Jane".to_string(),
            given_name: "Jane".to_string(),
            family_name: "Doe".to_string(),
            org_code: "01HD1234".to_string(),
            manager_empl_id: String::new(),
            activity_code: "SAF-101".to_string(),
            activity_name: "Lab Safety".to_string(),
            assignment_status: "Required".to_string(),
            requirement_status: "Completed".to_string(),
            assigned_date: "05/01/24".to_string(),
            due_date: "06/01/24".to_string(),
            expiration_date: String::new(),
            last_attempt_date: "05/20/24".to_string(),
            last_completion_date: "05/20/24".to_string(),
        }
    }

    /// Mock runner that accepts every batch write, recording batch sizes.
    fn recording_runner(batches: Arc<Mutex<Vec<usize>>>) -> MockCommandRunner {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(move |spec| {
            assert_eq!(spec.program, "aws");
            assert_eq!(spec.args[..2], ["dynamodb", "batch-write-item"]);

            let payload = spec
                .args
                .iter()
                .position(|a| a == "--request-items")
                .map(|i| spec.args[i + 1].clone())
                .unwrap();
            let request: Value = serde_json::from_str(&payload).unwrap();
            let puts = request["lms_assignments"].as_array().unwrap();

            batches.lock().unwrap().push(puts.len());
            Ok(CommandOutput::succeeded())
        });
        runner
    }

    #[test]
    fn test_convert_date() {
        assert_eq!(convert_date("").unwrap(), "");
        assert_eq!(convert_date("05/01/24").unwrap(), "2024-05-01T00:00:00");
        assert!(convert_date("2024-05-01").is_err());
    }

    #[test]
    fn test_field_conversions() {
        assert_eq!(convert_nullable(""), "null");
        assert_eq!(convert_nullable("E100"), "E100");
        assert_eq!(convert_org_code("01HD1234"), "1234");
        assert_eq!(convert_org_code("9999"), "9999");
    }

    #[test]
    fn test_build_item_skips_non_person_rows() {
        let mut row = sample_row();
        row.username = "svc-batch".to_string();
        assert!(build_item(&row, "2024-06-01T12:00:00").unwrap().is_none());

        row.username = String::new();
        assert!(build_item(&row, "2024-06-01T12:00:00").unwrap().is_none());
    }

    #[test]
    fn test_build_item_attribute_mapping() {
        let item = build_item(&sample_row(), "2024-06-01T12:00:00")
            .unwrap()
            .unwrap();

        assert_eq!(item["lms_user_id"]["N"], "123");
        assert_eq!(item["activity_id"]["N"], "4711");
        assert_eq!(item["empl_org_code"]["S"], "1234");
        assert_eq!(item["manager_empl_id"]["S"], "null");
        assert_eq!(item["is_required"]["BOOL"], true);
        assert_eq!(item["assignment_status"]["S"], "Completed");
        assert_eq!(item["assigned_date"]["S"], "2024-05-01T00:00:00");
        assert_eq!(item["expiration_date"]["S"], "");
        assert_eq!(item["last_updated_datetime"]["S"], "2024-06-01T12:00:00");
        assert_eq!(item["last_updated_event_id"]["N"], "0");
    }

    #[test]
    fn test_build_item_rejects_bad_date() {
        let mut row = sample_row();
        row.due_date = "June 1st".to_string();
        let err = build_item(&row, "2024-06-01T12:00:00").unwrap_err();
        assert!(matches!(err, BootstrapError::DataLoad(_)));
    }

    #[test]
    fn test_load_csv_writes_person_rows_and_skips_the_rest() {
        let tmp = tempfile::tempdir().unwrap();
        let file = write_csv(
            tmp.path(),
            &[
                person_row("100"),
                person_row("svc-account"),
                person_row("200"),
                person_row("300"),
            ],
        );

        let batches = Arc::new(Mutex::new(Vec::new()));
        let runner = recording_runner(batches.clone());

        let report = load_csv(&runner, &DynamoConfig::default(), &file).unwrap();

        assert_eq!(report.items_written, 3);
        assert_eq!(report.rows_skipped, 1);
        assert_eq!(*batches.lock().unwrap(), vec![3]);
    }

    #[test]
    fn test_load_csv_batches_at_dynamodb_limit() {
        let tmp = tempfile::tempdir().unwrap();
        let rows: Vec<String> = (0..30).map(|i| person_row(&format!("{}", 100 + i))).collect();
        let file = write_csv(tmp.path(), &rows);

        let batches = Arc::new(Mutex::new(Vec::new()));
        let runner = recording_runner(batches.clone());

        let report = load_csv(&runner, &DynamoConfig::default(), &file).unwrap();

        assert_eq!(report.items_written, 30);
        assert_eq!(*batches.lock().unwrap(), vec![25, 5]);
    }

    #[test]
    fn test_load_csv_stops_at_item_cap() {
        let tmp = tempfile::tempdir().unwrap();
        let rows: Vec<String> = (0..5010)
            .map(|i| person_row(&format!("{}", 100_000 + i)))
            .collect();
        let file = write_csv(tmp.path(), &rows);

        let batches = Arc::new(Mutex::new(Vec::new()));
        let runner = recording_runner(batches.clone());

        let report = load_csv(&runner, &DynamoConfig::default(), &file).unwrap();

        assert_eq!(report.items_written, 5000);
        let sizes = batches.lock().unwrap();
        assert_eq!(sizes.len(), 200);
        assert_eq!(sizes.iter().sum::<usize>(), 5000);
    }

    #[test]
    fn test_load_csv_failed_batch_is_terminal() {
        let tmp = tempfile::tempdir().unwrap();
        let file = write_csv(tmp.path(), &[person_row("100")]);

        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(|_| {
            Ok(CommandOutput {
                success: false,
                stdout: String::new(),
                stderr: "An error occurred (ThrottlingException) when calling BatchWriteItem"
                    .to_string(),
            })
        });

        let err = load_csv(&runner, &DynamoConfig::default(), &file).unwrap_err();
        assert!(matches!(err, BootstrapError::DataLoad(_)));
    }

    #[test]
    fn test_error_help_lookup() {
        let (code, help) =
            error_help("An error occurred (ThrottlingException) in BatchWriteItem").unwrap();
        assert_eq!(code, "ThrottlingException");
        assert!(help.contains("back-off"));

        assert!(error_help("SomethingNovelException").is_none());
    }
}
