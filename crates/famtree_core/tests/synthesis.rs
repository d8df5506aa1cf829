use famtree_core::{
    index_people, synthesize, synthesize_with_report, ChartOptions, Person, PersonMap,
};
use std::collections::BTreeSet;

fn person(id: &str, name: &str, spouse: Option<&str>, parents: &[&str]) -> Person {
    let mut person = Person::new(id, name);
    person.spouse = spouse.map(str::to_string);
    person.parents = parents.iter().map(|p| p.to_string()).collect();
    person
}

fn statement_set(description: &str) -> BTreeSet<&str> {
    description.lines().collect()
}

fn edges(description: &str) -> Vec<&str> {
    description
        .lines()
        .filter(|line| line.contains("-->") || line.contains("---"))
        .collect()
}

fn merge_nodes(description: &str) -> usize {
    description
        .lines()
        .filter(|line| line.ends_with(":::marriage"))
        .count()
}

#[test]
fn married_parents_share_one_merge_node() {
    let people = index_people(vec![
        person("1", "A", Some("2"), &[]),
        person("2", "B", Some("1"), &[]),
        person("3", "C", None, &["1", "2"]),
    ]);

    let description = synthesize(&people);

    assert_eq!(merge_nodes(&description), 1);
    assert!(description.contains("subgraph SG_M_1 [ ]\ndirection LR\nN_1 --- M_1 --- N_2\nend\n"));
    assert!(description.contains("M_1 --> N_3\n"));
    assert!(!description.contains("N_1 --> N_3"));
    assert!(!description.contains("N_2 --> N_3"));
}

#[test]
fn one_sided_spouse_link_still_forms_the_marriage() {
    let people = index_people(vec![
        person("1", "A", None, &[]),
        person("2", "B", Some("1"), &[]),
        person("3", "C", None, &["2", "1"]),
    ]);

    let synthesis = synthesize_with_report(&people, &ChartOptions::default());

    assert_eq!(synthesis.report.marriages, 1);
    assert_eq!(synthesis.report.merge_edges, 1);
    assert_eq!(synthesis.report.direct_edges, 0);
}

#[test]
fn dangling_extra_parent_still_routes_through_the_marriage() {
    let people = index_people(vec![
        person("1", "A", Some("2"), &[]),
        person("2", "B", None, &[]),
        person("3", "C", None, &["1", "2", "99"]),
    ]);

    let synthesis = synthesize_with_report(&people, &ChartOptions::default());

    assert_eq!(synthesis.report.merge_edges, 1);
    assert_eq!(synthesis.report.direct_edges, 0);
    assert_eq!(synthesis.report.skipped_references, 1);
    assert_eq!(
        edges(&synthesis.description)
            .into_iter()
            .filter(|line| line.contains("-->"))
            .collect::<Vec<_>>(),
        vec!["M_1 --> N_3"]
    );
}

#[test]
fn repeated_parent_id_still_routes_through_the_marriage() {
    let people = index_people(vec![
        person("1", "A", Some("2"), &[]),
        person("2", "B", None, &[]),
        person("3", "C", None, &["1", "2", "1"]),
    ]);

    let synthesis = synthesize_with_report(&people, &ChartOptions::default());

    assert_eq!(synthesis.report.merge_edges, 1);
    assert_eq!(synthesis.report.direct_edges, 0);
    assert!(synthesis.description.contains("M_1 --> N_3\n"));
    assert!(!synthesis.description.contains("N_1 --> N_3"));
}

#[test]
fn unmarried_parent_gets_a_direct_edge() {
    let people = index_people(vec![
        person("1", "A", None, &[]),
        person("2", "B", None, &["1"]),
    ]);

    let description = synthesize(&people);

    assert_eq!(edges(&description), vec!["N_1 --> N_2"]);
    assert_eq!(merge_nodes(&description), 0);
}

#[test]
fn dangling_parent_yields_no_edges_and_no_error() {
    let people = index_people(vec![person("1", "A", None, &["99"])]);

    let synthesis = synthesize_with_report(&people, &ChartOptions::default());

    assert!(edges(&synthesis.description).is_empty());
    assert_eq!(synthesis.report.people, 1);
    assert_eq!(synthesis.report.skipped_references, 1);
}

#[test]
fn two_parents_without_a_marriage_get_two_direct_edges() {
    let people = index_people(vec![
        person("1", "A", None, &[]),
        person("2", "B", None, &[]),
        person("3", "C", None, &["1", "2"]),
    ]);

    let description = synthesize(&people);

    let found: BTreeSet<&str> = edges(&description).into_iter().collect();
    assert_eq!(found, BTreeSet::from(["N_1 --> N_3", "N_2 --> N_3"]));
}

#[test]
fn parents_married_to_someone_else_are_not_merged() {
    let people = index_people(vec![
        person("1", "A", Some("4"), &[]),
        person("2", "B", None, &[]),
        person("3", "C", None, &["1", "2"]),
        person("4", "D", None, &[]),
    ]);

    let synthesis = synthesize_with_report(&people, &ChartOptions::default());

    assert_eq!(synthesis.report.marriages, 1);
    assert_eq!(synthesis.report.merge_edges, 0);
    assert_eq!(synthesis.report.direct_edges, 2);
}

#[test]
fn one_node_statement_per_valid_person() {
    let mut rows: Vec<Person> = (0..30)
        .map(|i| person(&format!("p{i}"), &format!("Person {i}"), None, &[]))
        .collect();
    rows.push(person("", "broken", None, &[]));

    let description = synthesize(&index_people(rows));

    assert_eq!(
        description
            .lines()
            .filter(|line| line.ends_with(":::person"))
            .count(),
        30
    );
}

#[test]
fn output_does_not_depend_on_input_order() {
    let rows = vec![
        person("b", "B", Some("a"), &[]),
        person("a", "A", Some("b"), &[]),
        person("c", "C", None, &["a", "b"]),
        person("d", "D", Some("c"), &["b"]),
        person("e", "E", None, &["c", "d"]),
    ];
    let mut reversed = rows.clone();
    reversed.reverse();
    let mut rotated = rows.clone();
    rotated.rotate_left(2);

    let forward = synthesize(&index_people(rows));
    let backward = synthesize(&index_people(reversed));
    let shifted = synthesize(&index_people(rotated));

    assert_eq!(forward, backward);
    assert_eq!(statement_set(&forward), statement_set(&shifted));
    assert_eq!(merge_nodes(&forward), 2);
    assert!(forward.contains("M_1 --> N_c\n"));
    assert!(forward.contains("M_2 --> N_e\n"));
    assert!(forward.contains("N_b --> N_d\n"));
}

#[test]
fn repeated_synthesis_is_identical() {
    let people = index_people(vec![
        person("1", "A", Some("2"), &[]),
        person("2", "B", None, &[]),
        person("3", "C", None, &["1", "2"]),
    ]);
    assert_eq!(synthesize(&people), synthesize(&people));
}

#[test]
fn labels_never_carry_raw_delimiters() {
    let mut tricky = person("1", r#"<script>"Eve"</script>"#, None, &[]);
    tricky.birth = Some("19<50".to_string());
    tricky.death = Some("\"2000\"".to_string());

    let description = synthesize(&index_people(vec![tricky]));
    let node = description
        .lines()
        .find(|line| line.starts_with("N_1("))
        .unwrap();

    assert_eq!(
        node,
        "N_1(\"scriptEve/script<br/><small>1950 - 2000</small>\"):::person"
    );
}

#[test]
fn punctuated_ids_do_not_collide() {
    let people: PersonMap = index_people(vec![
        person("a-b", "dash", None, &[]),
        person("a_b", "underscore", None, &[]),
        person("child", "kid", None, &["a-b"]),
    ]);

    let description = synthesize(&people);

    assert_eq!(
        description
            .lines()
            .filter(|line| line.ends_with(":::person"))
            .count(),
        3
    );
    assert!(description.contains("N_a_2d_b --> N_child\n"));
    assert!(!description.contains("N_a_5f_b --> N_child"));
}
