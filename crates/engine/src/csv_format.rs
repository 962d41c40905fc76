//! Sectioned CSV import/export.
//!
//! A document is a sequence of sections, each introduced by a tag line:
//!
//! ```text
//! SETTINGS
//! Total Cost,Start Date,End Date,Exchange Rate,Show USD,Round USD,Calculation Method
//! 1300,2025-10-16,2025-10-28,1.07,false,false,equal
//!
//! PARTICIPANTS
//! Name,Arrival Date,Departure Date,Nightly Rate
//! Andrej,2025-10-16,2025-10-28,false
//!
//! ADDITIONAL_ACTIVITIES
//! Type,Description,Amount,From Participants,To Participants
//! loan,Groceries,100,Andrej,"Jane;Anna"
//! ```
//!
//! Exports also carry `RESULTS` and `NIGHT BREAKDOWN` sections, which the
//! importer skips. `ADDITIONAL_MODULES` is accepted as a legacy tag.
use csv::{ReaderBuilder, StringRecord, Terminator, Trim, WriterBuilder};
use uuid::Uuid;

use crate::{
    Activity, ActivityKind, BookingSettings, CalculationInput, CalculationMethod,
    CalculationResult, EngineError, Participant, ResultEngine,
    booking::DEFAULT_EXCHANGE_RATE,
    util::{name_key, parse_date},
};

const SETTINGS_HEADER: [&str; 7] = [
    "Total Cost",
    "Start Date",
    "End Date",
    "Exchange Rate",
    "Show USD",
    "Round USD",
    "Calculation Method",
];
const PARTICIPANTS_HEADER: [&str; 4] = ["Name", "Arrival Date", "Departure Date", "Nightly Rate"];
const ACTIVITIES_HEADER: [&str; 5] = [
    "Type",
    "Description",
    "Amount",
    "From Participants",
    "To Participants",
];
const NIGHTS_HEADER: [&str; 5] = [
    "Date",
    "People Present",
    "Count",
    "Nightly Cost",
    "Per-Person Cost",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Preamble,
    Settings,
    Participants,
    Activities,
    Skipped,
}

impl Section {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "SETTINGS" => Some(Self::Settings),
            "PARTICIPANTS" => Some(Self::Participants),
            "ADDITIONAL_ACTIVITIES" | "ADDITIONAL_MODULES" => Some(Self::Activities),
            "RESULTS" | "NIGHT BREAKDOWN" => Some(Self::Skipped),
            _ => None,
        }
    }

    /// A header row carries at least the required columns of the section, in
    /// order. Optional trailing columns may be missing from older exports.
    fn is_header(self, record: &StringRecord) -> bool {
        let (header, required): (&[&str], usize) = match self {
            Self::Settings => (&SETTINGS_HEADER, 6),
            Self::Participants => (&PARTICIPANTS_HEADER, 3),
            Self::Activities => (&ACTIVITIES_HEADER, 5),
            Self::Preamble | Self::Skipped => return false,
        };
        record.len() >= required && record.iter().zip(header).all(|(field, column)| field == *column)
    }
}

/// Result of importing a CSV document.
///
/// Participants get fresh ids; activities reference them by id. Activities
/// whose providers or recipients could not be matched by name are left out and
/// their descriptions listed in `skipped_activities`.
#[derive(Clone, Debug, PartialEq)]
pub struct CsvImport {
    pub settings: Option<BookingSettings>,
    pub participants: Vec<Participant>,
    pub activities: Vec<Activity>,
    pub skipped_activities: Vec<String>,
}

impl CsvImport {
    /// Turns the import into engine input. Fails when the document had no
    /// usable SETTINGS row.
    pub fn into_input(self) -> ResultEngine<CalculationInput> {
        let settings = self
            .settings
            .ok_or_else(|| EngineError::Import("No settings found in CSV file".to_string()))?;
        Ok(CalculationInput::new(self.participants, settings, self.activities))
    }
}

struct ActivityRow {
    kind: ActivityKind,
    description: String,
    amount: f64,
    from_names: Vec<String>,
    to_names: Vec<String>,
}

/// Parses a sectioned CSV document.
pub fn import_csv(text: &str) -> ResultEngine<CsvImport> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut section = Section::Preamble;
    let mut settings = None;
    let mut participants = Vec::new();
    let mut activity_rows = Vec::new();

    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let first = record.get(0).unwrap_or_default();
        if record.len() == 1
            && let Some(next) = Section::from_tag(first)
        {
            section = next;
            continue;
        }
        if section.is_header(&record) {
            continue;
        }

        match section {
            Section::Settings => {
                if let Some(parsed) = parse_settings(&record)? {
                    settings = Some(parsed);
                }
            }
            Section::Participants => participants.push(parse_participant(&record)?),
            Section::Activities => {
                if let Some(row) = parse_activity(&record)? {
                    activity_rows.push(row);
                }
            }
            Section::Preamble | Section::Skipped => {}
        }
    }

    if participants.is_empty() {
        return Err(EngineError::Import("No participants found in CSV file".to_string()));
    }

    let mut activities = Vec::new();
    let mut skipped_activities = Vec::new();
    for row in activity_rows {
        let from_participant_ids = resolve_names(&participants, &row.from_names);
        let to_participant_ids = resolve_names(&participants, &row.to_names);
        if from_participant_ids.is_empty() || to_participant_ids.is_empty() {
            skipped_activities.push(row.description);
            continue;
        }
        activities.push(Activity {
            id: Uuid::new_v4().to_string(),
            kind: row.kind,
            description: row.description,
            amount: row.amount,
            from_participant_ids,
            to_participant_ids,
            split_equally: true,
            tips: Vec::new(),
        });
    }

    Ok(CsvImport {
        settings,
        participants,
        activities,
        skipped_activities,
    })
}

fn parse_settings(record: &StringRecord) -> ResultEngine<Option<BookingSettings>> {
    if record.len() < 6 {
        return Ok(None);
    }
    let field = |idx: usize| record.get(idx).unwrap_or_default();

    let mut settings = BookingSettings::new(
        field(0).parse().unwrap_or(0.0),
        parse_date(field(1), "start date")?,
        parse_date(field(2), "end date")?,
    );
    settings.exchange_rate = field(3).parse().unwrap_or(DEFAULT_EXCHANGE_RATE);
    settings.show_usd = field(4) == "true";
    settings.round_usd = field(5) == "true";
    if let Some(method) = record.get(6).filter(|m| !m.is_empty()) {
        settings.calculation_method = CalculationMethod::try_from(method)?;
    }
    Ok(Some(settings))
}

fn parse_participant(record: &StringRecord) -> ResultEngine<Participant> {
    let name = record.get(0).unwrap_or_default();
    let arrival = record.get(1).unwrap_or_default();
    let departure = record.get(2).unwrap_or_default();
    if name.is_empty() || arrival.is_empty() || departure.is_empty() {
        return Err(EngineError::Import(
            "All participants must have name, arrival date, and departure date".to_string(),
        ));
    }

    let participant = Participant::new(
        name,
        parse_date(arrival, &format!("{name} arrival date"))?,
        parse_date(departure, &format!("{name} departure date"))?,
    );
    Ok(participant.with_nightly_rate(record.get(3) == Some("true")))
}

fn parse_activity(record: &StringRecord) -> ResultEngine<Option<ActivityRow>> {
    if record.len() < 5 {
        return Ok(None);
    }
    let field = |idx: usize| record.get(idx).unwrap_or_default();
    let names = |idx: usize| -> Vec<String> {
        field(idx)
            .split(';')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(ToString::to_string)
            .collect()
    };

    Ok(Some(ActivityRow {
        kind: ActivityKind::try_from(field(0))?,
        description: field(1).to_string(),
        amount: field(2).parse().unwrap_or(0.0),
        from_names: names(3),
        to_names: names(4),
    }))
}

/// Maps names to participant ids; unmatched names are dropped.
fn resolve_names(participants: &[Participant], names: &[String]) -> Vec<String> {
    names
        .iter()
        .filter_map(|name| {
            let key = name_key(name)?;
            participants
                .iter()
                .find(|p| name_key(&p.name).as_deref() == Some(key.as_str()))
                .map(|p| p.id.clone())
        })
        .collect()
}

/// Writes the input and its computed result as a sectioned CSV document that
/// [`import_csv`] can read back.
pub fn export_csv(input: &CalculationInput, result: &CalculationResult) -> ResultEngine<String> {
    let settings = &input.settings;
    let mut out = String::new();

    write_section(
        &mut out,
        "SETTINGS",
        &SETTINGS_HEADER,
        vec![vec![
            settings.total_cost.to_string(),
            settings.start_date.to_string(),
            settings.end_date.to_string(),
            settings.exchange_rate.to_string(),
            settings.show_usd.to_string(),
            settings.round_usd.to_string(),
            settings.calculation_method.as_str().to_string(),
        ]],
    )?;

    write_section(
        &mut out,
        "PARTICIPANTS",
        &PARTICIPANTS_HEADER,
        input
            .participants
            .iter()
            .map(|p| {
                vec![
                    p.name.clone(),
                    p.arrival_date.to_string(),
                    p.departure_date.to_string(),
                    p.use_nightly_rate.to_string(),
                ]
            })
            .collect(),
    )?;

    if !input.additional_activities.is_empty() {
        let names = |ids: &[String]| -> String {
            ids.iter()
                .filter_map(|id| input.participants.iter().find(|p| &p.id == id))
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(";")
        };
        write_section(
            &mut out,
            "ADDITIONAL_ACTIVITIES",
            &ACTIVITIES_HEADER,
            input
                .additional_activities
                .iter()
                .map(|a| {
                    vec![
                        a.kind.as_str().to_string(),
                        a.description.clone(),
                        a.amount.to_string(),
                        names(&a.from_participant_ids),
                        names(&a.to_participant_ids),
                    ]
                })
                .collect(),
        )?;
    }

    let mut results_header = vec![
        "Name",
        "Arrival Date",
        "Departure Date",
        "Nights",
        "Base Amount (EUR)",
        "Additional Charges",
        "Additional Credits",
        "Final Amount (EUR)",
    ];
    if settings.show_usd {
        results_header.push("Final Amount (USD)");
    }
    let usd_decimals = if settings.round_usd { 0 } else { 2 };
    write_section(
        &mut out,
        "RESULTS",
        &results_header,
        result
            .participants
            .iter()
            .map(|p| {
                let mut row = vec![
                    p.name.clone(),
                    p.arrival_date.to_string(),
                    p.departure_date.to_string(),
                    p.nights.to_string(),
                    format!("{:.2}", p.amount_eur),
                    format!("{:.2}", p.additional_charges),
                    format!("{:.2}", p.additional_credits),
                    format!("{:.2}", p.final_amount_eur),
                ];
                if settings.show_usd {
                    row.push(format!("{:.usd_decimals$}", p.final_amount_usd));
                }
                row
            })
            .collect(),
    )?;

    write_section(
        &mut out,
        "NIGHT BREAKDOWN",
        &NIGHTS_HEADER,
        result
            .night_breakdown
            .iter()
            .map(|night| {
                vec![
                    night.date.to_string(),
                    night.present_participants.join(", "),
                    night.participant_count.to_string(),
                    format!("{:.2}", night.nightly_cost),
                    format!("{:.2}", night.per_person_cost),
                ]
            })
            .collect(),
    )?;

    Ok(out)
}

fn write_section(out: &mut String, tag: &str, header: &[&str], rows: Vec<Vec<String>>) -> ResultEngine<()> {
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record([tag])?;
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| EngineError::Import(format!("failed to flush CSV: {err}")))?;
    let text = String::from_utf8(bytes)
        .map_err(|err| EngineError::Import(format!("CSV is not UTF-8: {err}")))?;
    out.push_str(&text);
    out.push('\n');
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    const DOCUMENT: &str = "SETTINGS
Total Cost,Start Date,End Date,Exchange Rate,Show USD,Round USD
1300,2025-10-16,2025-10-28,1.1,true,false

PARTICIPANTS
Name,Arrival Date,Departure Date
Andrej,2025-10-16,2025-10-28
Jane,2025-10-16,2025-10-28
Amélie,2025-10-16,2025-10-26

ADDITIONAL_MODULES
Type,Description,Amount,From Participants,To Participants
loan,\"Groceries, market\",100,\"andrej\",\"Jane;AMELIE\"
service_provided,\"Yoga\",40,\"Nobody\",\"Jane\"

RESULTS
Name,Arrival Date,Departure Date,Nights,Base Amount (EUR)
Andrej,2025-10-16,2025-10-28,12,433.33
";

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn imports_every_section() {
        let import = import_csv(DOCUMENT).unwrap();

        let settings = import.settings.unwrap();
        assert_eq!(settings.total_cost, 1300.0);
        assert_eq!(settings.end_date, date("2025-10-28"));
        assert_eq!(settings.exchange_rate, 1.1);
        assert!(settings.show_usd);
        assert_eq!(settings.calculation_method, CalculationMethod::Equal);

        let names: Vec<&str> = import.participants.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Andrej", "Jane", "Amélie"]);
    }

    #[test]
    fn participant_called_name_is_not_a_header() {
        let text = "PARTICIPANTS
Name,Arrival Date,Departure Date,Nightly Rate
Name,2025-10-16,2025-10-18
Bob,2025-10-16,2025-10-18,true
";
        let import = import_csv(text).unwrap();

        let names: Vec<&str> = import.participants.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Name", "Bob"]);
        assert!(import.participants[1].use_nightly_rate);
    }

    #[test]
    fn activity_names_match_case_and_accent_insensitively() {
        let import = import_csv(DOCUMENT).unwrap();

        assert_eq!(import.activities.len(), 1);
        let loan = &import.activities[0];
        assert_eq!(loan.description, "Groceries, market");
        assert_eq!(loan.from_participant_ids, vec![import.participants[0].id.clone()]);
        assert_eq!(
            loan.to_participant_ids,
            vec![import.participants[1].id.clone(), import.participants[2].id.clone()]
        );
        assert_eq!(import.skipped_activities, vec!["Yoga".to_string()]);
    }

    #[test]
    fn missing_participants_fail() {
        let err = import_csv("SETTINGS\n100,2025-10-16,2025-10-20,1.07,false,false\n").unwrap_err();
        assert_eq!(err, EngineError::Import("No participants found in CSV file".to_string()));
    }

    #[test]
    fn incomplete_participant_fails() {
        let err = import_csv("PARTICIPANTS\nAnna,2025-10-16,\n").unwrap_err();
        assert_eq!(
            err,
            EngineError::Import(
                "All participants must have name, arrival date, and departure date".to_string()
            )
        );
    }

    #[test]
    fn bad_date_is_reported() {
        let err = import_csv("PARTICIPANTS\nAnna,16.10.2025,2025-10-20\n").unwrap_err();
        assert!(matches!(err, EngineError::InvalidDate(_)));
    }

    #[test]
    fn unparsable_rate_falls_back_to_default() {
        let import =
            import_csv("SETTINGS\n100,2025-10-16,2025-10-20,abc,false,false\nPARTICIPANTS\nA,2025-10-16,2025-10-18\n")
                .unwrap();
        assert_eq!(import.settings.unwrap().exchange_rate, DEFAULT_EXCHANGE_RATE);
    }

    #[test]
    fn export_reads_back_as_the_same_input() {
        let mut input = import_csv(DOCUMENT).unwrap().into_input().unwrap();
        input.settings.calculation_method = CalculationMethod::Mixed;
        input.participants[2].use_nightly_rate = true;
        let result = input.calculate();

        let text = export_csv(&input, &result).unwrap();
        assert!(text.contains("RESULTS\n"));
        assert!(text.contains("NIGHT BREAKDOWN\n"));
        assert!(text.contains("\"Groceries, market\""));

        let again = import_csv(&text).unwrap();
        assert_eq!(again.settings.as_ref(), Some(&input.settings));
        assert_eq!(again.participants.len(), 3);
        assert!(again.participants[2].use_nightly_rate);
        assert_eq!(again.activities.len(), 1);
        assert_eq!(again.activities[0].amount, 100.0);
        assert_eq!(again.activities[0].to_participant_ids.len(), 2);
    }

    #[test]
    fn usd_column_follows_settings() {
        let mut input = import_csv(DOCUMENT).unwrap().into_input().unwrap();
        input.settings.round_usd = true;
        let result = input.calculate();
        let text = export_csv(&input, &result).unwrap();

        let andrej = text
            .lines()
            .find(|line| line.starts_with("Andrej,2025-10-16,2025-10-28,12,"))
            .unwrap();
        // (1300 / 3 - 100) * 1.1 = 366.67 -> 367
        assert!(andrej.ends_with(",367"), "{andrej}");
    }
}
