pub const RECORD_ID_COLUMN: &str = "Record ID";
pub const ID_COLUMN: &str = "ACTIONCAMPAIGNID";
pub const COOKIE_COLUMN: &str = "CAMPAIGN_COOKIE_DATA_JSON";

/// Campaign attribute holding the landing page URL whose query string feeds the UTM group.
pub const PAGE_URL_FIELD: &str = "Campaign_Page__c";

pub const CAMPAIGN_FIELDS: [&str; 6] = [
    "Campaign_Name__c", "Campaign_Content__c", "Campaign_Keywords__c",
    "Campaign_Medium__c", "Campaign_Referrer__c", PAGE_URL_FIELD,
];

pub const VISITOR_FIELDS: [&str; 9] = [
    "Visitor_ID__c", "Visitor_IP_Address__c", "Campaign_Page_View_Count__c",
    "First_Visit_Time__c", "Previous_Session_Start_Time__c", "Current_Session_Start_Time__c",
    "Campaign_Session_Count__c", "Campaign_Hit_Count__c", "Responded_Date__c",
];

pub const UTM_FIELDS: [&str; 16] = [
    "utm_source", "utm_medium", "utm_term", "utm_content", "utm_campaign", "utm_id",
    "gclid", "gbraid", "wbraid", "gad_source", "gclsrc", "_hsenc", "_hsmi",
    "fbclid", "ccid", "campaign",
];

/// Where a field group takes its values from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// Decoded cookie attributes only.
    Attributes,
    /// Page URL query parameter, falling back to the decoded cookie attribute.
    QueryThenAttributes,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldGroup {
    pub name: &'static str,
    pub fields: &'static [&'static str],
    pub source: ValueSource,
}

/// Output groups in column order.
pub const FIELD_GROUPS: [FieldGroup; 3] = [
    FieldGroup { name: "campaign", fields: &CAMPAIGN_FIELDS, source: ValueSource::Attributes },
    FieldGroup { name: "visitor", fields: &VISITOR_FIELDS, source: ValueSource::Attributes },
    FieldGroup { name: "utm", fields: &UTM_FIELDS, source: ValueSource::QueryThenAttributes },
];

pub fn field_count() -> usize {
    FIELD_GROUPS.iter().map(|g| g.fields.len()).sum()
}

/// Output header: `Record ID` followed by every group's fields.
pub fn output_header() -> Vec<&'static str> {
    let mut header = Vec::with_capacity(field_count() + 1);
    header.push(RECORD_ID_COLUMN);
    for group in FIELD_GROUPS.iter() {
        header.extend_from_slice(group.fields);
    }
    header
}
