// src/edgar/header.rs
use crate::edgar::models::normalize_cik;
use crate::parsers::model::FilingMetadata;

// Company blocks in the order we prefer them: the subject/issuer is the
// company the events are about, not the filer or reporting owner.
const COMPANY_GROUPS: &[&str] = &["SUBJECT COMPANY", "ISSUER", "FILER"];

#[derive(Debug, Default)]
struct Company {
    group: String,
    name: Option<String>,
    cik: Option<String>,
}

/// Reads filing metadata from the `<SEC-HEADER>` block of a full-text
/// submission. Returns `None` unless the accession number, form type and a
/// company CIK are all present.
pub fn read_sec_header(content: &str) -> Option<FilingMetadata> {
    let header = header_block(content);

    let mut accession_number = None;
    let mut form_type = None;
    let mut filing_date = None;
    let mut companies: Vec<Company> = Vec::new();

    for raw_line in header.lines() {
        let Some((key, value)) = raw_line.split_once(':') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());

        if value.is_empty() {
            // Unindented headings ("SUBJECT COMPANY:", "FILER:") open a new
            // company block; indented ones ("COMPANY DATA:") are sub-sections.
            if !raw_line.starts_with(char::is_whitespace) {
                companies.push(Company {
                    group: key.to_string(),
                    ..Company::default()
                });
            }
            continue;
        }

        match key {
            "ACCESSION NUMBER" => {
                accession_number.get_or_insert_with(|| value.to_string());
            }
            "CONFORMED SUBMISSION TYPE" => {
                form_type.get_or_insert_with(|| value.to_string());
            }
            "FILED AS OF DATE" => {
                filing_date.get_or_insert_with(|| iso_filing_date(value));
            }
            "COMPANY CONFORMED NAME" => {
                current_company(&mut companies).name = Some(value.to_string());
            }
            "CENTRAL INDEX KEY" => {
                current_company(&mut companies).cik = normalize_cik(value).ok();
            }
            _ => {}
        }
    }

    let company = COMPANY_GROUPS
        .iter()
        .find_map(|g| companies.iter().find(|c| c.group == *g && c.cik.is_some()))
        .or_else(|| companies.iter().find(|c| c.cik.is_some()))?;

    let metadata = FilingMetadata {
        accession_number: accession_number?,
        cik: company.cik.clone()?,
        company_name: company.name.clone().unwrap_or_default(),
        filing_date: filing_date.unwrap_or_default(),
        form_type: form_type?,
    };
    tracing::debug!(
        "Read SEC header: {} {} for CIK {}",
        metadata.form_type,
        metadata.accession_number,
        metadata.cik
    );
    Some(metadata)
}

fn header_block(content: &str) -> &str {
    let start = content.find("<SEC-HEADER>").unwrap_or(0);
    let rest = &content[start..];
    let end = rest
        .find("</SEC-HEADER>")
        .or_else(|| rest.find("<DOCUMENT>"))
        .unwrap_or(rest.len());
    &rest[..end]
}

/// The block being filled, opening an anonymous one for headers without
/// group headings.
fn current_company(companies: &mut Vec<Company>) -> &mut Company {
    if companies.is_empty() {
        companies.push(Company::default());
    }
    let last = companies.len() - 1;
    &mut companies[last]
}

/// "20240105" becomes "2024-01-05"; other layouts are kept.
fn iso_filing_date(value: &str) -> String {
    if value.len() == 8 && value.chars().all(|c| c.is_ascii_digit()) {
        format!("{}-{}-{}", &value[..4], &value[4..6], &value[6..])
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SC_13D_HEADER: &str = "<SEC-DOCUMENT>0000950170-24-001234.txt : 20240105
<SEC-HEADER>0000950170-24-001234.hdr.sgml : 20240105
ACCESSION NUMBER:\t\t0000950170-24-001234
CONFORMED SUBMISSION TYPE:\tSC 13D
PUBLIC DOCUMENT COUNT:\t\t1
FILED AS OF DATE:\t\t20240105

SUBJECT COMPANY:\t

\tCOMPANY DATA:\t
\t\tCOMPANY CONFORMED NAME:\t\t\tACME CORP
\t\tCENTRAL INDEX KEY:\t\t\t0000000123

FILED BY:\t

\tCOMPANY DATA:\t
\t\tCOMPANY CONFORMED NAME:\t\t\tRAIDER CAPITAL LP
\t\tCENTRAL INDEX KEY:\t\t\t0001999999
</SEC-HEADER>
<DOCUMENT>
<TYPE>SC 13D
";

    #[test]
    fn reads_subject_company_not_filer() {
        let metadata = read_sec_header(SC_13D_HEADER).unwrap();
        assert_eq!(
            metadata,
            FilingMetadata {
                accession_number: "0000950170-24-001234".to_string(),
                cik: "123".to_string(),
                company_name: "ACME CORP".to_string(),
                filing_date: "2024-01-05".to_string(),
                form_type: "SC 13D".to_string(),
            }
        );
    }

    #[test]
    fn form4_prefers_issuer_over_reporting_owner() {
        let content = "<SEC-HEADER>
ACCESSION NUMBER:\t0001-24-000001
CONFORMED SUBMISSION TYPE:\t4
FILED AS OF DATE:\t20240212
REPORTING-OWNER:
\tOWNER DATA:
\t\tCOMPANY CONFORMED NAME:\tDOE JANE
\t\tCENTRAL INDEX KEY:\t0001111111
ISSUER:
\tCOMPANY DATA:
\t\tCOMPANY CONFORMED NAME:\tACME CORP
\t\tCENTRAL INDEX KEY:\t0000000123
</SEC-HEADER>";
        let metadata = read_sec_header(content).unwrap();
        assert_eq!(metadata.company_name, "ACME CORP");
        assert_eq!(metadata.cik, "123");
        assert_eq!(metadata.form_type, "4");
        assert_eq!(metadata.filing_date, "2024-02-12");
    }

    #[test]
    fn single_company_without_group() {
        let content = "ACCESSION NUMBER: 0001-23\nCONFORMED SUBMISSION TYPE: 8-K\nFILED AS OF DATE: 2024-01-05\nCOMPANY CONFORMED NAME: Acme\nCENTRAL INDEX KEY: 123\n<DOCUMENT>\nItem 8.01";
        let metadata = read_sec_header(content).unwrap();
        assert_eq!(metadata.cik, "123");
        assert_eq!(metadata.filing_date, "2024-01-05");
    }

    #[test]
    fn missing_identity_yields_none() {
        assert!(read_sec_header("Item 8.01. Other Events").is_none());
        assert!(read_sec_header("ACCESSION NUMBER: 0001-23\nCONFORMED SUBMISSION TYPE: 8-K\n").is_none());
    }
}
