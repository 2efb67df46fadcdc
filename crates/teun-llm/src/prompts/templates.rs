//! Instruction text for prompt generation.
//!
//! Placeholders in `{braces}` are filled by [`render`]; everything else is
//! sent verbatim.

use teun_core::KeywordProfile;

pub const GENERATOR_SYSTEM: &str = r#"Je schrijft zoekvragen zoals echte mensen ze LETTERLIJK intypen in ChatGPT, Perplexity of Google AI Mode wanneer ze een bedrijf, dienstverlener of product zoeken.

PRIORITEITEN
1. Natuurlijk: elke vraag klinkt als iemand die een slimme vriend om advies vraagt.
2. Commercieel: minstens 60% van de vragen is gericht op het VINDEN of INHUREN van een aanbieder.
3. Neutraal: noem NOOIT de naam van het bedrijf zelf; deze mensen kennen het bedrijf nog niet.
4. Gevarieerd: wissel vraagvormen, beginwoorden en invalshoeken af.
5. Uitsluitend Nederlands.

VOORBEELDEN VAN DE JUISTE STIJL
- "Welke dakdekker in Utrecht is betrouwbaar voor een lekkend plat dak?"
- "Hoeveel kost het gemiddeld om een badkamer te laten verbouwen?"
- "Kun je goede fysiotherapeuten in Den Haag voor rugklachten aanraden?"
- "Waar moet ik op letten bij het kiezen van een boekhouder voor mijn eenmanszaak?"
- "Is zelf laminaat leggen goedkoper dan een vakman inhuren?"

NIET TOEGESTAAN
- Opdrachten in plaats van vragen ("Schrijf een artikel over...", "Maak een lijst van...", "Genereer...").
- Losse zoekwoorden zonder zin ("loodgieter rotterdam").
- Vragen korter dan 8 of langer dan 18 woorden.

TAAL
- Gebruik altijd het juiste voorzetsel: "in Amsterdam", niet "Amsterdam" los achter het zoekwoord.
- Plaatsnamen met hoofdletter: Amsterdam, Den Haag, 's-Hertogenbosch.
- Volledige, natuurlijke zinnen.

Antwoord uitsluitend met een JSON-array."#;

const WEBSITE_CONTEXT: &str = r#"BEDRIJFSCONTEXT
- Bedrijfsnaam: {company}
- Branche: {category}
- Locatie: {location}
- Diensten/producten: {services}
- Doelgroep: {audience}

ZOEKWOORDEN VAN DE WEBSITE (gebruik precies deze termen, geen synoniemen die de betekenis veranderen):
{keyword_list}

Verdeel de vragen eerlijk over alle zoekwoorden; elk zoekwoord komt in 3 tot 5 vragen terug."#;

const MANUAL_CONTEXT: &str = r#"ZOEKWOORD: "{keyword}"
BRANCHE: {industry}
SERVICEGEBIED: {location}

Elke vraag bevat "{keyword}" of een directe variant daarvan."#;

const LOCATION_SPLIT: &str = r#"LOCATIEVERDELING
- ongeveer {with_location} vragen MET de locatie "{location}" (bijvoorbeeld "beste ... in {location}")
- ongeveer {without_location} vragen ZONDER locatie, om landelijke zichtbaarheid te testen"#;

const BRAND_EXCLUSION: &str = r#"Noem "{brand}" in geen enkele vraag."#;

const OUTPUT_SPEC: &str = r#"Genereer PRECIES {count} zoekvragen.

{context}
{location_block}
{brand_block}

OUTPUT: een JSON-array met {count} objecten in deze vorm:
[{
  "text": "de volledige vraag zoals iemand die intypt",
  "intent": "commercial" of "informational",
  "intentCluster": "korte thematische clusternaam",
  "coreKeyword": "het zoekwoord waar de vraag om draait",
  "trendSignal": "rising" of "stable" of "declining",
  "estimatedGoogleVolume": geschat aantal zoekopdrachten per maand in Nederland (getal),
  "difficulty": "easy" of "medium" of "hard"
}]

CLUSTERS: 10 tot 15 clusters van 3 tot 5 vragen, bijvoorbeeld "Beste aanbieders in de regio", "Kosten en prijzen", "Vergelijken en kiezen", "Reviews en ervaringen", "Wanneer heb je het nodig", "Werkwijze", "Alternatieven".

INTENT: minstens 60% commercial, de rest informational.

VOLUME EN MOEILIJKHEID
- easy = niche of long-tail (50-200 per maand), medium = gangbaar (200-1000), hard = veel concurrentie (1000+)
- rising = groeiend onderwerp, stable = altijd relevant, declining = neemt af

Alleen de JSON-array, geen toelichting."#;

/// Replaces each `{key}` in `template` with its value.
#[must_use]
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{key}}}"), value)
    })
}

fn or_unknown(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or("Onbekend")
}

#[must_use]
pub fn website_context(
    profile: &KeywordProfile,
    industry: Option<&str>,
    location: Option<&str>,
) -> String {
    let keyword_list = profile
        .keywords
        .iter()
        .enumerate()
        .map(|(i, kw)| format!("{}. \"{kw}\"", i + 1))
        .collect::<Vec<_>>()
        .join("\n");
    let services = profile.services.join(", ");
    render(
        WEBSITE_CONTEXT,
        &[
            ("company", or_unknown(profile.company_name.as_deref())),
            (
                "category",
                or_unknown(profile.category.as_deref().or(industry)),
            ),
            (
                "location",
                profile
                    .location
                    .as_deref()
                    .or(location)
                    .filter(|l| !l.trim().is_empty())
                    .unwrap_or("Nederland"),
            ),
            ("services", or_unknown(Some(services.as_str()))),
            ("audience", or_unknown(profile.target_audience.as_deref())),
            ("keyword_list", &keyword_list),
        ],
    )
}

#[must_use]
pub fn manual_context(keyword: &str, industry: Option<&str>, location: Option<&str>) -> String {
    render(
        MANUAL_CONTEXT,
        &[
            ("keyword", keyword),
            ("industry", or_unknown(industry)),
            (
                "location",
                location.filter(|l| !l.trim().is_empty()).unwrap_or("Nederland"),
            ),
        ],
    )
}

#[must_use]
pub fn location_split(location: &str, count: usize) -> String {
    let with_location = count.div_ceil(2).to_string();
    let without_location = (count / 2).to_string();
    render(
        LOCATION_SPLIT,
        &[
            ("with_location", &with_location),
            ("without_location", &without_location),
            ("location", location),
        ],
    )
}

#[must_use]
pub fn brand_exclusion(brand: &str) -> String {
    render(BRAND_EXCLUSION, &[("brand", brand)])
}

#[must_use]
pub fn generator_user_prompt(
    count: usize,
    context: &str,
    location_block: &str,
    brand_block: &str,
) -> String {
    let count = count.to_string();
    render(
        OUTPUT_SPEC,
        &[
            ("count", &count),
            ("context", context),
            ("location_block", location_block),
            ("brand_block", brand_block),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_replaces_every_occurrence() {
        assert_eq!(render("{a} en {a} of {b}", &[("a", "x"), ("b", "y")]), "x en x of y");
    }

    #[test]
    fn manual_context_requires_keyword_in_every_prompt() {
        let ctx = manual_context("linnen gordijnen", Some("gordijnwinkel"), Some("Amsterdam"));
        assert!(ctx.contains("ZOEKWOORD: \"linnen gordijnen\""));
        assert!(ctx.contains("BRANCHE: gordijnwinkel"));
        assert!(ctx.contains("SERVICEGEBIED: Amsterdam"));
        assert!(ctx.contains("Elke vraag bevat \"linnen gordijnen\""));
    }

    #[test]
    fn manual_context_defaults_unknowns() {
        let ctx = manual_context("schilder", None, Some("  "));
        assert!(ctx.contains("BRANCHE: Onbekend"));
        assert!(ctx.contains("SERVICEGEBIED: Nederland"));
    }

    #[test]
    fn website_context_numbers_keywords() {
        let profile = KeywordProfile {
            keywords: vec!["dakdekker utrecht".to_string(), "plat dak".to_string()],
            company_name: Some("Dakdekker Jansen".to_string()),
            category: None,
            location: None,
            services: vec![],
            target_audience: None,
        };
        let ctx = website_context(&profile, Some("dakdekker"), Some("Utrecht"));
        assert!(ctx.contains("1. \"dakdekker utrecht\"\n2. \"plat dak\""));
        assert!(ctx.contains("Branche: dakdekker"));
        assert!(ctx.contains("Locatie: Utrecht"));
        assert!(ctx.contains("Diensten/producten: Onbekend"));
    }

    #[test]
    fn location_split_halves_count() {
        let block = location_split("Amsterdam", 50);
        assert!(block.contains("ongeveer 25 vragen MET de locatie \"Amsterdam\""));
        assert!(block.contains("ongeveer 25 vragen ZONDER"));
    }

    #[test]
    fn user_prompt_has_no_unfilled_placeholders() {
        let prompt = generator_user_prompt(50, "CTX", "", "");
        assert!(prompt.contains("PRECIES 50 zoekvragen"));
        assert!(!prompt.contains("{count}"));
        assert!(!prompt.contains("{context}"));
    }
}
