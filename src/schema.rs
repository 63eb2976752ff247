//! Record Schema - typed resume entities
//!
//! Raw input is deserialized into loose `Raw*` forms, then every field is
//! checked against its rules. Nothing is kept from a load that fails.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::validation::{
    AbsoluteUrl, EmailAddress, FieldCheck, GpaScale, MinLength, NonEmpty, OneOf, PhoneNumber,
    ValidationError, YearMonth as YearMonthRule, YearMonthOrPresent, PRESENT,
};

pub const EMPLOYMENT_TYPES: &[&str] = &[
    "Full-time",
    "Part-time",
    "Self-employed",
    "Freelance",
    "Contract",
    "Internship",
    "Apprenticeship",
    "Seasonal",
];

pub const PROFICIENCY_LEVELS: &[&str] = &[
    "Native or Bilingual",
    "Full Professional",
    "Professional Working",
    "Limited Working",
    "Elementary",
];

/// Minimum length of free-text descriptions that are required.
pub const MIN_DESCRIPTION_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmploymentType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    #[serde(rename = "Self-employed")]
    SelfEmployed,
    Freelance,
    Contract,
    Internship,
    Apprenticeship,
    Seasonal,
}

impl EmploymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullTime => "Full-time",
            Self::PartTime => "Part-time",
            Self::SelfEmployed => "Self-employed",
            Self::Freelance => "Freelance",
            Self::Contract => "Contract",
            Self::Internship => "Internship",
            Self::Apprenticeship => "Apprenticeship",
            Self::Seasonal => "Seasonal",
        }
    }
}

impl FromStr for EmploymentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Full-time" => Ok(Self::FullTime),
            "Part-time" => Ok(Self::PartTime),
            "Self-employed" => Ok(Self::SelfEmployed),
            "Freelance" => Ok(Self::Freelance),
            "Contract" => Ok(Self::Contract),
            "Internship" => Ok(Self::Internship),
            "Apprenticeship" => Ok(Self::Apprenticeship),
            "Seasonal" => Ok(Self::Seasonal),
            other => Err(format!("unknown employment type: {}", other)),
        }
    }
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Proficiency {
    #[serde(rename = "Native or Bilingual")]
    NativeOrBilingual,
    #[serde(rename = "Full Professional")]
    FullProfessional,
    #[serde(rename = "Professional Working")]
    ProfessionalWorking,
    #[serde(rename = "Limited Working")]
    LimitedWorking,
    Elementary,
}

impl Proficiency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NativeOrBilingual => "Native or Bilingual",
            Self::FullProfessional => "Full Professional",
            Self::ProfessionalWorking => "Professional Working",
            Self::LimitedWorking => "Limited Working",
            Self::Elementary => "Elementary",
        }
    }
}

impl FromStr for Proficiency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Native or Bilingual" => Ok(Self::NativeOrBilingual),
            "Full Professional" => Ok(Self::FullProfessional),
            "Professional Working" => Ok(Self::ProfessionalWorking),
            "Limited Working" => Ok(Self::LimitedWorking),
            "Elementary" => Ok(Self::Elementary),
            other => Err(format!("unknown proficiency level: {}", other)),
        }
    }
}

impl fmt::Display for Proficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A calendar month written as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("expected YYYY-MM, got {}", s))?;
        let year = year.parse::<i32>().map_err(|e| e.to_string())?;
        let month = month.parse::<u32>().map_err(|e| e.to_string())?;
        if !(1..=12).contains(&month) {
            return Err(format!("month out of range: {}", month));
        }
        Ok(Self { year, month })
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One end of a date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatePoint {
    Month(YearMonth),
    Present,
}

impl FromStr for DatePoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == PRESENT {
            Ok(Self::Present)
        } else {
            s.parse().map(Self::Month)
        }
    }
}

impl fmt::Display for DatePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month(m) => m.fmt(f),
            Self::Present => f.write_str(PRESENT),
        }
    }
}

impl Serialize for DatePoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// `[start, end]`. No ordering between the two ends is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: DatePoint,
    pub end: DatePoint,
}

impl DateRange {
    /// Validates the raw two-element form used by every ranged entity.
    pub fn from_raw(check: &FieldCheck<'_>, field: &str, raw: &[String]) -> Result<Self, ValidationError> {
        if raw.len() != 2 {
            return Err(check
                .violation(
                    field,
                    "date_range",
                    "Duration must have exactly 2 elements [start, end]",
                    Some("2 elements".to_string()),
                    Some(format!("{} elements", raw.len())),
                )
                .into());
        }
        check.check(field, &raw[0], &[&YearMonthOrPresent])?;
        check.check(field, &raw[1], &[&YearMonthOrPresent])?;
        Ok(Self {
            start: parse_checked(check, field, &raw[0])?,
            end: parse_checked(check, field, &raw[1])?,
        })
    }
}

impl Serialize for DateRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.start, self.end].serialize(serializer)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// GPA keeps the text it was written with; the value is only used for range checks.
#[derive(Debug, Clone, PartialEq)]
pub struct Gpa {
    pub text: String,
    pub value: f64,
}

impl Serialize for Gpa {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl fmt::Display for Gpa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn parse_checked<T: FromStr<Err = String>>(
    check: &FieldCheck<'_>,
    field: &str,
    value: &str,
) -> Result<T, ValidationError> {
    value.parse::<T>().map_err(|e| {
        check
            .violation(field, "parse", e, None, Some(value.to_string()))
            .into()
    })
}

/// An entity kind that can be validated from its raw form.
pub trait Record: Sized {
    type Raw: DeserializeOwned;

    /// Keys that must be present in the raw entity.
    const REQUIRED: &'static [&'static str];

    fn from_raw(raw: Self::Raw, check: &FieldCheck<'_>) -> Result<Self, ValidationError>;

    /// Rendering filter; singletons are always included.
    fn included(&self) -> bool {
        true
    }
}

fn default_true() -> bool { true }

// --- Raw forms ---

#[derive(Debug, Clone, Deserialize)]
pub struct RawApplicationInfo {
    pub company: String,
    pub job: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGeneral {
    pub name: String,
    pub title: String,
    pub location: String,
    pub email: String,
    #[serde(default)]
    pub cell_number: Option<String>,
    pub portfolio: String,
    pub linkedin: String,
    pub github: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawReference {
    pub name: String,
    pub position: String,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub web: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawJob {
    #[serde(default = "default_true")]
    pub include: bool,
    pub title: String,
    pub company: String,
    pub employment_type: String,
    pub duration: Vec<String>,
    #[serde(default)]
    pub references: Option<Vec<Value>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEducation {
    #[serde(default = "default_true")]
    pub include: bool,
    pub school: String,
    #[serde(default)]
    pub degree: Option<String>,
    pub field: String,
    pub duration: Vec<String>,
    #[serde(default)]
    pub gpa: Option<String>,
    #[serde(default)]
    pub activities_and_societies: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCertification {
    #[serde(default = "default_true")]
    pub include: bool,
    pub name: String,
    pub issuer: String,
    pub issued_on: String,
    pub credential_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawVolunteer {
    #[serde(default = "default_true")]
    pub include: bool,
    pub organization: String,
    pub role: String,
    pub cause: String,
    pub duration: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawProject {
    #[serde(default = "default_true")]
    pub include: bool,
    pub name: String,
    pub duration: Vec<String>,
    #[serde(default)]
    pub link: Option<String>,
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAward {
    #[serde(default = "default_true")]
    pub include: bool,
    pub title: String,
    pub issuer: String,
    pub issued_on: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLanguage {
    #[serde(default = "default_true")]
    pub include: bool,
    pub language: String,
    pub proficiency: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawArticle {
    #[serde(default = "default_true")]
    pub include: bool,
    pub title: String,
    pub publication: String,
    pub date: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

// --- Validated entities ---

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationInfo {
    pub company: String,
    pub job: String,
}

impl Record for ApplicationInfo {
    type Raw = RawApplicationInfo;
    const REQUIRED: &'static [&'static str] = &["company", "job"];

    fn from_raw(raw: Self::Raw, check: &FieldCheck<'_>) -> Result<Self, ValidationError> {
        check.check("company", &raw.company, &[&NonEmpty])?;
        check.check("job", &raw.job, &[&NonEmpty])?;
        Ok(Self { company: raw.company, job: raw.job })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneralProfile {
    pub name: String,
    pub title: String,
    pub location: String,
    pub email: String,
    pub cell_number: Option<String>,
    pub portfolio: String,
    pub linkedin: String,
    pub github: String,
    pub description: String,
}

impl Record for GeneralProfile {
    type Raw = RawGeneral;
    const REQUIRED: &'static [&'static str] = &["name", "title", "location", "email", "portfolio", "linkedin", "github", "description"];

    fn from_raw(raw: Self::Raw, check: &FieldCheck<'_>) -> Result<Self, ValidationError> {
        check.check("name", &raw.name, &[&NonEmpty])?;
        check.check("title", &raw.title, &[&NonEmpty])?;
        check.check("location", &raw.location, &[&NonEmpty])?;
        check.check("email", &raw.email, &[&EmailAddress])?;
        check.check_opt("cell_number", raw.cell_number.as_deref(), &[&PhoneNumber])?;
        check.check("portfolio", &raw.portfolio, &[&AbsoluteUrl])?;
        check.check("linkedin", &raw.linkedin, &[&AbsoluteUrl])?;
        check.check("github", &raw.github, &[&AbsoluteUrl])?;
        check.check("description", &raw.description, &[&MinLength(MIN_DESCRIPTION_LEN)])?;
        Ok(Self {
            name: raw.name,
            title: raw.title,
            location: raw.location,
            email: raw.email,
            cell_number: raw.cell_number,
            portfolio: raw.portfolio,
            linkedin: raw.linkedin,
            github: raw.github,
            description: raw.description,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reference {
    pub name: String,
    pub position: String,
    pub number: Option<String>,
    pub web: Option<String>,
}

impl Record for Reference {
    type Raw = RawReference;
    const REQUIRED: &'static [&'static str] = &["name", "position"];

    fn from_raw(raw: Self::Raw, check: &FieldCheck<'_>) -> Result<Self, ValidationError> {
        check.check("name", &raw.name, &[&NonEmpty])?;
        check.check("position", &raw.position, &[&NonEmpty])?;
        check.check_opt("number", raw.number.as_deref(), &[&PhoneNumber])?;
        check.check_opt("web", raw.web.as_deref(), &[&AbsoluteUrl])?;
        Ok(Self {
            name: raw.name,
            position: raw.position,
            number: raw.number,
            web: raw.web,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobEntry {
    pub include: bool,
    pub title: String,
    pub company: String,
    pub employment_type: EmploymentType,
    pub duration: DateRange,
    pub description: Option<String>,
    pub skills: Option<Vec<String>>,
    pub references: Option<Vec<Reference>>,
}

impl Record for JobEntry {
    type Raw = RawJob;
    const REQUIRED: &'static [&'static str] = &["title", "company", "employment_type", "duration"];

    fn from_raw(raw: Self::Raw, check: &FieldCheck<'_>) -> Result<Self, ValidationError> {
        check.check("title", &raw.title, &[&NonEmpty])?;
        check.check("company", &raw.company, &[&NonEmpty])?;
        check.check("employment_type", &raw.employment_type, &[&NonEmpty, &OneOf(EMPLOYMENT_TYPES)])?;
        let employment_type = parse_checked(check, "employment_type", &raw.employment_type)?;
        let duration = DateRange::from_raw(check, "duration", &raw.duration)?;

        let references = match raw.references {
            Some(refs) => {
                let mut out = Vec::with_capacity(refs.len());
                for (i, r) in refs.iter().enumerate() {
                    let path = format!("{}.references[{}]", check.entity(), i);
                    out.push(parse_record::<Reference>(r, &path)?);
                }
                Some(out)
            }
            None => None,
        };

        Ok(Self {
            include: raw.include,
            title: raw.title,
            company: raw.company,
            employment_type,
            duration,
            description: raw.description,
            skills: raw.skills,
            references,
        })
    }

    fn included(&self) -> bool {
        self.include
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EducationEntry {
    pub include: bool,
    pub school: String,
    pub degree: Option<String>,
    pub field: String,
    pub duration: DateRange,
    pub gpa: Option<Gpa>,
    pub activities_and_societies: Option<Vec<String>>,
    pub description: Option<String>,
}

impl Record for EducationEntry {
    type Raw = RawEducation;
    const REQUIRED: &'static [&'static str] = &["school", "field", "duration"];

    fn from_raw(raw: Self::Raw, check: &FieldCheck<'_>) -> Result<Self, ValidationError> {
        check.check("school", &raw.school, &[&NonEmpty])?;
        check.check("field", &raw.field, &[&NonEmpty])?;
        let duration = DateRange::from_raw(check, "duration", &raw.duration)?;
        check.check_opt("gpa", raw.gpa.as_deref(), &[&GpaScale])?;
        let gpa = match raw.gpa {
            Some(text) => {
                let value = text.trim().parse::<f64>().map_err(|e| {
                    ValidationError::from(check.violation("gpa", "gpa", e.to_string(), None, Some(text.clone())))
                })?;
                Some(Gpa { text, value })
            }
            None => None,
        };
        Ok(Self {
            include: raw.include,
            school: raw.school,
            degree: raw.degree,
            field: raw.field,
            duration,
            gpa,
            activities_and_societies: raw.activities_and_societies,
            description: raw.description,
        })
    }

    fn included(&self) -> bool {
        self.include
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CertificationEntry {
    pub include: bool,
    pub name: String,
    pub issuer: String,
    pub issued_on: YearMonth,
    pub credential_id: String,
}

impl Record for CertificationEntry {
    type Raw = RawCertification;
    const REQUIRED: &'static [&'static str] = &["name", "issuer", "issued_on", "credential_id"];

    fn from_raw(raw: Self::Raw, check: &FieldCheck<'_>) -> Result<Self, ValidationError> {
        check.check("name", &raw.name, &[&NonEmpty])?;
        check.check("issuer", &raw.issuer, &[&NonEmpty])?;
        check.check("issued_on", &raw.issued_on, &[&YearMonthRule])?;
        let issued_on = parse_checked(check, "issued_on", &raw.issued_on)?;
        check.check("credential_id", &raw.credential_id, &[&NonEmpty])?;
        Ok(Self {
            include: raw.include,
            name: raw.name,
            issuer: raw.issuer,
            issued_on,
            credential_id: raw.credential_id,
        })
    }

    fn included(&self) -> bool {
        self.include
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolunteerEntry {
    pub include: bool,
    pub organization: String,
    pub role: String,
    pub cause: String,
    pub duration: DateRange,
    pub description: Option<String>,
}

impl Record for VolunteerEntry {
    type Raw = RawVolunteer;
    const REQUIRED: &'static [&'static str] = &["organization", "role", "cause", "duration"];

    fn from_raw(raw: Self::Raw, check: &FieldCheck<'_>) -> Result<Self, ValidationError> {
        check.check("organization", &raw.organization, &[&NonEmpty])?;
        check.check("role", &raw.role, &[&NonEmpty])?;
        check.check("cause", &raw.cause, &[&NonEmpty])?;
        let duration = DateRange::from_raw(check, "duration", &raw.duration)?;
        Ok(Self {
            include: raw.include,
            organization: raw.organization,
            role: raw.role,
            cause: raw.cause,
            duration,
            description: raw.description,
        })
    }

    fn included(&self) -> bool {
        self.include
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectEntry {
    pub include: bool,
    pub name: String,
    pub duration: DateRange,
    pub link: Option<String>,
    pub description: String,
    pub skills: Vec<String>,
}

impl Record for ProjectEntry {
    type Raw = RawProject;
    const REQUIRED: &'static [&'static str] = &["name", "duration", "description"];

    fn from_raw(raw: Self::Raw, check: &FieldCheck<'_>) -> Result<Self, ValidationError> {
        check.check("name", &raw.name, &[&NonEmpty])?;
        let duration = DateRange::from_raw(check, "duration", &raw.duration)?;
        check.check_opt("link", raw.link.as_deref(), &[&AbsoluteUrl])?;
        check.check("description", &raw.description, &[&MinLength(MIN_DESCRIPTION_LEN)])?;
        Ok(Self {
            include: raw.include,
            name: raw.name,
            duration,
            link: raw.link,
            description: raw.description,
            skills: raw.skills,
        })
    }

    fn included(&self) -> bool {
        self.include
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AwardEntry {
    pub include: bool,
    pub title: String,
    pub issuer: String,
    pub issued_on: YearMonth,
    pub description: String,
}

impl Record for AwardEntry {
    type Raw = RawAward;
    const REQUIRED: &'static [&'static str] = &["title", "issuer", "issued_on", "description"];

    fn from_raw(raw: Self::Raw, check: &FieldCheck<'_>) -> Result<Self, ValidationError> {
        check.check("title", &raw.title, &[&NonEmpty])?;
        check.check("issuer", &raw.issuer, &[&NonEmpty])?;
        check.check("issued_on", &raw.issued_on, &[&YearMonthRule])?;
        let issued_on = parse_checked(check, "issued_on", &raw.issued_on)?;
        check.check("description", &raw.description, &[&MinLength(MIN_DESCRIPTION_LEN)])?;
        Ok(Self {
            include: raw.include,
            title: raw.title,
            issuer: raw.issuer,
            issued_on,
            description: raw.description,
        })
    }

    fn included(&self) -> bool {
        self.include
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageEntry {
    pub include: bool,
    pub language: String,
    pub proficiency: Proficiency,
}

impl Record for LanguageEntry {
    type Raw = RawLanguage;
    const REQUIRED: &'static [&'static str] = &["language", "proficiency"];

    fn from_raw(raw: Self::Raw, check: &FieldCheck<'_>) -> Result<Self, ValidationError> {
        check.check("language", &raw.language, &[&NonEmpty])?;
        check.check("proficiency", &raw.proficiency, &[&NonEmpty, &OneOf(PROFICIENCY_LEVELS)])?;
        let proficiency = parse_checked(check, "proficiency", &raw.proficiency)?;
        Ok(Self {
            include: raw.include,
            language: raw.language,
            proficiency,
        })
    }

    fn included(&self) -> bool {
        self.include
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleEntry {
    pub include: bool,
    pub title: String,
    pub publication: String,
    pub date: YearMonth,
    pub url: Option<String>,
    pub description: Option<String>,
}

impl Record for ArticleEntry {
    type Raw = RawArticle;
    const REQUIRED: &'static [&'static str] = &["title", "publication", "date"];

    fn from_raw(raw: Self::Raw, check: &FieldCheck<'_>) -> Result<Self, ValidationError> {
        check.check("title", &raw.title, &[&NonEmpty])?;
        check.check("publication", &raw.publication, &[&NonEmpty])?;
        check.check("date", &raw.date, &[&YearMonthRule])?;
        let date = parse_checked(check, "date", &raw.date)?;
        check.check_opt("url", raw.url.as_deref(), &[&AbsoluteUrl])?;
        Ok(Self {
            include: raw.include,
            title: raw.title,
            publication: raw.publication,
            date,
            url: raw.url,
            description: raw.description,
        })
    }

    fn included(&self) -> bool {
        self.include
    }
}

// --- Loading ---

/// Section keys of the raw input document.
pub mod keys {
    pub const APPLICATION_INFO: &str = "ApplicationInfo";
    pub const GENERAL: &str = "General";
    pub const JOBS: &str = "Jobs";
    pub const EDUCATION: &str = "Education";
    pub const CERTIFICATIONS: &str = "LicensesAndCertifications";
    pub const VOLUNTEERING: &str = "VolunteerExperience";
    pub const PROJECTS: &str = "Projects";
    pub const AWARDS: &str = "HonorsAndAwards";
    pub const LANGUAGES: &str = "Languages";
    pub const ARTICLES: &str = "Articles";
}

/// Validates one raw entity found at `path`.
pub fn parse_record<R: Record>(value: &Value, path: &str) -> Result<R, ValidationError> {
    let fields = value.as_object().ok_or_else(|| ValidationError::Malformed {
        path: path.to_string(),
        message: format!("expected an object, found {}", json_kind(value)),
    })?;
    if let Some(missing) = R::REQUIRED.iter().find(|key| !fields.contains_key(**key)) {
        return Err(ValidationError::MissingField(format!("{}.{}", path, missing)));
    }

    let raw: R::Raw = serde_json::from_value(value.clone()).map_err(|e| ValidationError::Malformed {
        path: path.to_string(),
        message: e.to_string(),
    })?;
    R::from_raw(raw, &FieldCheck::new(path))
}

/// Validates every entry of a list-valued section, in input order.
/// An absent section is empty; the first bad entry fails the whole section.
pub fn parse_section<R: Record>(root: &Map<String, Value>, key: &str) -> Result<Vec<R>, ValidationError> {
    match root.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Object(entries)) => entries
            .iter()
            .map(|(name, value)| parse_record(value, &format!("{}.{}", key, name)))
            .collect(),
        Some(Value::Array(entries)) => entries
            .iter()
            .enumerate()
            .map(|(i, value)| parse_record(value, &format!("{}[{}]", key, i)))
            .collect(),
        Some(other) => Err(ValidationError::Malformed {
            path: key.to_string(),
            message: format!("expected an object or array of entries, found {}", json_kind(other)),
        }),
    }
}

fn parse_singleton<R: Record>(root: &Map<String, Value>, key: &str) -> Result<R, ValidationError> {
    let value = root
        .get(key)
        .ok_or_else(|| ValidationError::MissingSection(key.to_string()))?;
    parse_record(value, key)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// The validated resume. Built once, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resume {
    pub application: ApplicationInfo,
    pub general: GeneralProfile,
    pub jobs: Vec<JobEntry>,
    pub education: Vec<EducationEntry>,
    pub certifications: Vec<CertificationEntry>,
    pub volunteering: Vec<VolunteerEntry>,
    pub projects: Vec<ProjectEntry>,
    pub awards: Vec<AwardEntry>,
    pub languages: Vec<LanguageEntry>,
    pub articles: Vec<ArticleEntry>,
}

impl Resume {
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let root = value.as_object().ok_or_else(|| ValidationError::Malformed {
            path: "$".to_string(),
            message: format!("expected an object of sections, found {}", json_kind(value)),
        })?;

        Ok(Self {
            application: parse_singleton(root, keys::APPLICATION_INFO)?,
            general: parse_singleton(root, keys::GENERAL)?,
            jobs: parse_section(root, keys::JOBS)?,
            education: parse_section(root, keys::EDUCATION)?,
            certifications: parse_section(root, keys::CERTIFICATIONS)?,
            volunteering: parse_section(root, keys::VOLUNTEERING)?,
            projects: parse_section(root, keys::PROJECTS)?,
            awards: parse_section(root, keys::AWARDS)?,
            languages: parse_section(root, keys::LANGUAGES)?,
            articles: parse_section(root, keys::ARTICLES)?,
        })
    }

    pub fn from_json_str(input: &str) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_str(input).map_err(|e| ValidationError::Malformed {
            path: "$".to_string(),
            message: e.to_string(),
        })?;
        Self::from_value(&value)
    }
}
