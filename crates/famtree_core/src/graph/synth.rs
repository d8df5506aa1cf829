//! Person index to flowchart description.
//!
//! # Responsibility
//! - Emit one node statement per valid person.
//! - Group each marriage around one invisible merge-node.
//! - Route descent through the merge-node when both parents are married.
//!
//! # Invariants
//! - At most one merge-node per unordered spouse pair.
//! - A child whose distinct, resolvable parents are exactly one recorded
//!   marriage gets a single descent edge, from the merge-node; otherwise one
//!   edge per resolvable, distinct parent.
//! - Dangling ids are ignored and counted, never reported as errors.
//! - Output depends only on map contents (the map iterates in id order).

use crate::graph::sanitize::{
    node_token, sanitize_text, sanitize_url, PairKey, MARRIAGE_GROUP_PREFIX, MERGE_TOKEN_PREFIX,
};
use crate::graph::ChartOptions;
use crate::model::family::PersonMap;
use crate::model::person::Person;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

const PERSON_CLASS: &str = "person";
const MARRIAGE_CLASS: &str = "marriage";
const THUMBNAIL_WIDTH_PX: u32 = 48;

/// Counters collected while synthesizing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SynthesisReport {
    /// Node statements emitted.
    pub people: usize,
    /// Marriage groupings (merge-nodes) emitted.
    pub marriages: usize,
    /// `merge --> child` edges.
    pub merge_edges: usize,
    /// `parent --> child` edges.
    pub direct_edges: usize,
    /// Spouse or parent ids that did not resolve.
    pub skipped_references: usize,
}

/// Description text plus its report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    pub description: String,
    pub report: SynthesisReport,
}

/// Synthesizes a description with default chart options.
pub fn synthesize(people: &PersonMap) -> String {
    synthesize_with(people, &ChartOptions::default())
}

/// Synthesizes a description with explicit chart options.
pub fn synthesize_with(people: &PersonMap, options: &ChartOptions) -> String {
    synthesize_with_report(people, options).description
}

/// Synthesizes a description and returns emission counters alongside it.
pub fn synthesize_with_report(people: &PersonMap, options: &ChartOptions) -> Synthesis {
    let mut chart = ChartWriter::default();
    let mut report = SynthesisReport::default();

    chart.line(format_args!("flowchart {}", options.direction));
    chart.line(format_args!(
        "classDef {PERSON_CLASS} {};",
        options.person_style
    ));
    chart.line(format_args!(
        "classDef {MARRIAGE_CLASS} {};",
        options.marriage_style
    ));

    for person in valid_people(people) {
        chart.line(format_args!(
            "{}(\"{}\"):::{PERSON_CLASS}",
            node_token(&person.id),
            node_label(person, options)
        ));
        report.people += 1;
    }

    let marriages = emit_marriages(people, &mut chart, &mut report);
    emit_descent(people, &marriages, &mut chart, &mut report);

    debug!(
        "event=synthesize module=graph status=ok people={} marriages={} merge_edges={} direct_edges={} skipped_references={}",
        report.people,
        report.marriages,
        report.merge_edges,
        report.direct_edges,
        report.skipped_references
    );

    Synthesis {
        description: chart.finish(),
        report,
    }
}

fn emit_marriages(
    people: &PersonMap,
    chart: &mut ChartWriter,
    report: &mut SynthesisReport,
) -> BTreeMap<PairKey, String> {
    let mut marriages: BTreeMap<PairKey, String> = BTreeMap::new();

    for person in valid_people(people) {
        let Some(spouse_id) = person.spouse.as_deref() else {
            continue;
        };
        if spouse_id == person.id {
            continue;
        }
        let Some(spouse) = resolve(people, spouse_id) else {
            report.skipped_references += 1;
            continue;
        };

        let key = PairKey::for_ids(&person.id, &spouse.id);
        if marriages.contains_key(&key) {
            continue;
        }

        let merge = format!("{MERGE_TOKEN_PREFIX}{}", marriages.len() + 1);
        chart.line(format_args!("subgraph {MARRIAGE_GROUP_PREFIX}{merge} [ ]"));
        chart.line(format_args!("direction LR"));
        chart.line(format_args!("{} --- {merge} --- {}", key.low(), key.high()));
        chart.line(format_args!("end"));
        chart.line(format_args!("{merge}{{ }}:::{MARRIAGE_CLASS}"));

        report.marriages += 1;
        marriages.insert(key, merge);
    }

    marriages
}

fn emit_descent(
    people: &PersonMap,
    marriages: &BTreeMap<PairKey, String>,
    chart: &mut ChartWriter,
    report: &mut SynthesisReport,
) {
    for child in valid_people(people) {
        if child.parents.is_empty() {
            continue;
        }
        let child_token = node_token(&child.id);

        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut parents: Vec<&Person> = Vec::with_capacity(child.parents.len());
        for parent_id in &child.parents {
            if *parent_id == child.id || !seen.insert(parent_id.as_str()) {
                continue;
            }
            match resolve(people, parent_id) {
                Some(parent) => parents.push(parent),
                None => report.skipped_references += 1,
            }
        }

        if let [first, second] = parents.as_slice() {
            if let Some(merge) = marriages.get(&PairKey::for_ids(&first.id, &second.id)) {
                chart.line(format_args!("{merge} --> {child_token}"));
                report.merge_edges += 1;
                continue;
            }
        }

        for parent in parents {
            chart.line(format_args!("{} --> {child_token}", node_token(&parent.id)));
            report.direct_edges += 1;
        }
    }
}

fn valid_people(people: &PersonMap) -> impl Iterator<Item = &Person> {
    people.values().filter(|person| person.has_valid_id())
}

fn resolve<'a>(people: &'a PersonMap, id: &str) -> Option<&'a Person> {
    people.get(id).filter(|person| person.has_valid_id())
}

fn node_label(person: &Person, options: &ChartOptions) -> String {
    let mut label = String::new();

    if options.show_images {
        if let Some(url) = non_blank(person.image_url.as_deref()) {
            let url = sanitize_url(url);
            if !url.is_empty() {
                let _ = write!(
                    label,
                    "<img src='{url}' width='{THUMBNAIL_WIDTH_PX}'/><br/>"
                );
            }
        }
    }

    label.push_str(&sanitize_text(&person.name));
    label.push_str("<br/><small>");
    if let Some(birth) = non_blank(person.birth.as_deref()) {
        label.push_str(&sanitize_text(birth));
    }
    if let Some(death) = non_blank(person.death.as_deref()) {
        label.push_str(" - ");
        label.push_str(&sanitize_text(death));
    }
    label.push_str("</small>");
    label
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

#[derive(Default)]
struct ChartWriter {
    out: String,
}

impl ChartWriter {
    fn line(&mut self, args: std::fmt::Arguments<'_>) {
        // Writing into a String cannot fail.
        let _ = self.out.write_fmt(args);
        self.out.push('\n');
    }

    fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::{synthesize, synthesize_with, synthesize_with_report};
    use crate::graph::{ChartOptions, Direction};
    use crate::model::family::{index_people, PersonMap};
    use crate::model::person::Person;

    fn person(id: &str, name: &str, parents: &[&str]) -> Person {
        let mut person = Person::new(id, name);
        person.parents = parents.iter().map(|p| p.to_string()).collect();
        person
    }

    fn lines(description: &str) -> Vec<&str> {
        description.lines().collect()
    }

    #[test]
    fn header_declares_direction_and_classes() {
        let description = synthesize(&PersonMap::new());
        let lines = lines(&description);
        assert_eq!(lines[0], "flowchart TD");
        assert!(lines[1].starts_with("classDef person "));
        assert!(lines[2].starts_with("classDef marriage "));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn node_label_has_years_and_optional_death() {
        let mut living = Person::new("1", "Ann");
        living.birth = Some("1950".to_string());
        let mut late = Person::new("2", "Bo");
        late.birth = Some("1900".to_string());
        late.death = Some("1970".to_string());

        let description = synthesize(&index_people(vec![living, late]));
        assert!(description.contains("N_1(\"Ann<br/><small>1950</small>\"):::person\n"));
        assert!(description.contains("N_2(\"Bo<br/><small>1900 - 1970</small>\"):::person\n"));
    }

    #[test]
    fn empty_name_renders_blank_label() {
        let description = synthesize(&index_people(vec![Person::new("1", "")]));
        assert!(description.contains("N_1(\"<br/><small></small>\"):::person"));
    }

    #[test]
    fn images_can_be_disabled() {
        let mut with_image = Person::new("1", "Ann");
        with_image.image_url = Some("https://x.test/a.png".to_string());
        let people = index_people(vec![with_image]);

        let shown = synthesize(&people);
        assert!(shown.contains("<img src='https://x.test/a.png' width='48'/><br/>Ann"));

        let options = ChartOptions {
            show_images: false,
            direction: Direction::Lr,
            ..ChartOptions::default()
        };
        let hidden = synthesize_with(&people, &options);
        assert!(hidden.starts_with("flowchart LR\n"));
        assert!(!hidden.contains("<img"));
    }

    #[test]
    fn duplicate_parent_ids_emit_one_edge() {
        let people = index_people(vec![person("1", "A", &[]), person("2", "B", &["1", "1"])]);
        let synthesis = synthesize_with_report(&people, &ChartOptions::default());
        assert_eq!(synthesis.report.direct_edges, 1);
        assert_eq!(synthesis.description.matches("N_1 --> N_2").count(), 1);
    }

    #[test]
    fn self_parent_and_self_spouse_are_ignored() {
        let mut loner = person("1", "A", &["1"]);
        loner.spouse = Some("1".to_string());
        let synthesis = synthesize_with_report(&index_people(vec![loner]), &ChartOptions::default());
        assert_eq!(synthesis.report.marriages, 0);
        assert_eq!(synthesis.report.direct_edges, 0);
        assert!(!synthesis.description.contains("-->"));
    }

    #[test]
    fn more_than_two_parents_get_direct_edges() {
        let people = index_people(vec![
            person("1", "A", &[]),
            person("2", "B", &[]),
            person("3", "C", &[]),
            person("4", "D", &["1", "2", "3"]),
        ]);
        let synthesis = synthesize_with_report(&people, &ChartOptions::default());
        assert_eq!(synthesis.report.direct_edges, 3);
    }

    #[test]
    fn single_resolvable_parent_of_two_gets_direct_edge() {
        let people = index_people(vec![person("1", "A", &[]), person("2", "B", &["1", "404"])]);
        let synthesis = synthesize_with_report(&people, &ChartOptions::default());
        assert_eq!(synthesis.report.direct_edges, 1);
        assert_eq!(synthesis.report.skipped_references, 1);
        assert!(synthesis.description.contains("N_1 --> N_2\n"));
    }

    #[test]
    fn blank_ids_in_a_hand_built_map_are_skipped() {
        let mut people = PersonMap::new();
        people.insert(String::new(), Person::new("", "ghost"));
        people.insert("1".to_string(), person("1", "A", &[""]));

        let synthesis = synthesize_with_report(&people, &ChartOptions::default());
        assert_eq!(synthesis.report.people, 1);
        assert!(!synthesis.description.contains("ghost"));
        assert_eq!(synthesis.report.skipped_references, 1);
    }
}
