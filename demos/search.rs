use abe_matcher::{
    all_variables_in_config, compile, match_node, AttributeDefinition, Config, MatchReport,
    Memoize,
};

fn main() {
    let mut config = Config::new();
    for definition in [
        AttributeDefinition::integer("exchange_id"),
        AttributeDefinition::string_list("deal_ids"),
    ] {
        config.add_attr_domain(definition).unwrap();
    }

    let sources = [
        (1u64, r#"deal_ids one of ["deal-1", "deal-2"]"#),
        (2u64, r#"exchange_id = 5"#),
        (3u64, r#"exchange_id = 7 and deal_ids one of ["deal-4"]"#),
    ];
    let expressions: Vec<_> = sources
        .iter()
        .map(|(id, source)| {
            let mut node = abe_matcher::parse(source).unwrap();
            assert!(all_variables_in_config(&config, &node));
            compile(&mut config, &mut node);
            (*id, *source, node)
        })
        .collect();

    let mut builder = config.make_event();
    builder.with_integer("exchange_id", 5).unwrap();
    builder
        .with_string_list("deal_ids", &["deal-3", "deal-1"])
        .unwrap();
    let event = builder.build().unwrap();

    let mut memoize = Memoize::new(config.pred_count());
    let mut report = MatchReport::new();
    for (id, source, node) in &expressions {
        if match_node(&config, &event, node, Some(&mut memoize), Some(&mut report)) {
            println!(r#"Found ID: {id}, Expression: "{source}""#);
        }
    }
    println!(
        "Memoized: {} expressions, {} sub-expressions",
        report.expressions_memoized, report.sub_expressions_memoized
    );
}
