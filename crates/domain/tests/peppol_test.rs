use pac_routing_domain::{
    compute_participant_hash, compute_sml_hostname, resolve_document_type, PeppolEnvironment,
    PeppolScheme,
};
use std::str::FromStr;

#[test]
fn test_participant_hash_known_value() {
    assert_eq!(
        compute_participant_hash("0009", "123456789"),
        "8874539cbfa5af29d56194be355ac1b1"
    );
    assert_eq!(
        compute_participant_hash("0002", "12345678900012"),
        "e2de35a1c102f10d7d2314ce70ccaca4"
    );
}

#[test]
fn test_participant_hash_lowercases_input() {
    assert_eq!(
        compute_participant_hash("0009", "FR123"),
        compute_participant_hash("0009", "fr123")
    );
}

#[test]
fn test_sml_hostname_layout() {
    let hostname = compute_sml_hostname(PeppolEnvironment::Test.zone(), "0009", "123456789");
    assert_eq!(
        hostname,
        "B-8874539cbfa5af29d56194be355ac1b1.iso6523-actorid-upis.acc.edelivery.tech.ec.europa.eu"
    );
}

#[test]
fn test_sml_hostname_is_deterministic() {
    let zone = PeppolEnvironment::Production.zone();
    let first = compute_sml_hostname(zone, "0002", "12345678900012");
    let second = compute_sml_hostname(zone, "0002", "12345678900012");
    assert_eq!(first, second);
}

#[test]
fn test_sml_hostname_differs_between_zones() {
    let prod = compute_sml_hostname(PeppolEnvironment::Production.zone(), "0009", "1");
    let test = compute_sml_hostname(PeppolEnvironment::Test.zone(), "0009", "1");
    assert_ne!(prod, test);
    assert!(prod.ends_with(".iso6523-actorid-upis.edelivery.tech.ec.europa.eu"));
}

#[test]
fn test_scheme_codes() {
    assert_eq!(PeppolScheme::Siren.code(), "0009");
    assert_eq!(PeppolScheme::Siret.code(), "0002");
    assert_eq!(PeppolScheme::TvaFr.code(), "9957");
}

#[test]
fn test_scheme_parses_name_or_code() {
    assert_eq!(PeppolScheme::from_str("siren").unwrap(), PeppolScheme::Siren);
    assert_eq!(PeppolScheme::from_str("0002").unwrap(), PeppolScheme::Siret);
    assert_eq!(PeppolScheme::from_str("TVA_FR").unwrap(), PeppolScheme::TvaFr);
    assert!(PeppolScheme::from_str("duns").is_err());
}

#[test]
fn test_environment_parse() {
    assert_eq!(
        PeppolEnvironment::from_str("TEST").unwrap(),
        PeppolEnvironment::Test
    );
    assert_eq!(
        PeppolEnvironment::from_str("production").unwrap(),
        PeppolEnvironment::Production
    );
    assert!(PeppolEnvironment::from_str("staging").is_err());
}

#[test]
fn test_document_type_keys_resolve() {
    let ubl = resolve_document_type("invoice_ubl");
    assert!(ubl.starts_with("busdox-docid-qns::urn:oasis:names:specification:ubl:schema:xsd:Invoice-2::Invoice##"));
    assert!(ubl.ends_with("urn:fdc:peppol.eu:2017:poacc:billing:3.0::2.1"));

    let cii = resolve_document_type("invoice_cii");
    assert!(cii.contains("CrossIndustryInvoice:100::CrossIndustryInvoice##"));
    assert!(cii.ends_with("::D16B"));
}

#[test]
fn test_unknown_document_type_passes_through() {
    assert_eq!(resolve_document_type("my-doc-id"), "my-doc-id");
}
