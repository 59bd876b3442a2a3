use abe_matcher::{compile, match_node, AttributeDefinition, Config, Event, Memoize};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

const AN_EXPRESSION: &str = r#"exchange_id = 1 and deal_ids one of ["deal-1", "deal-2"] and segment_ids one of [1, 2, 3] and country = 'CA' and city in ['QC'] or country = 'US' and city in ['AZ']"#;

fn define_config() -> Config {
    let mut config = Config::new();
    for definition in [
        AttributeDefinition::integer("exchange_id"),
        AttributeDefinition::string_list("deal_ids"),
        AttributeDefinition::integer_list("segment_ids"),
        AttributeDefinition::bounded_string("country", 300),
        AttributeDefinition::bounded_string("city", 1000),
    ] {
        config.add_attr_domain(definition).unwrap();
    }
    config
}

fn an_event(config: &Config) -> Event {
    let mut builder = config.make_event();
    builder.with_integer("exchange_id", 5).unwrap();
    builder
        .with_string_list("deal_ids", &["deal-3", "deal-1"])
        .unwrap();
    builder
        .with_integer_list("segment_ids", &[3, 4, 5])
        .unwrap();
    builder.with_string("country", "US").unwrap();
    builder.with_string("city", "AZ").unwrap();
    builder.build().unwrap()
}

pub fn parse_and_compile(c: &mut Criterion) {
    c.bench_function("parse_and_compile", |b| {
        b.iter_batched(
            define_config,
            |mut config| {
                let mut node = abe_matcher::parse(AN_EXPRESSION).unwrap();
                compile(&mut config, &mut node);
                std::hint::black_box(node)
            },
            BatchSize::SmallInput,
        )
    });
}

pub fn matching(c: &mut Criterion) {
    let mut config = define_config();
    let mut node = abe_matcher::parse(AN_EXPRESSION).unwrap();
    compile(&mut config, &mut node);
    c.bench_function("match", |b| {
        b.iter_batched(
            || (an_event(&config), Memoize::new(config.pred_count())),
            |(event, mut memoize)| {
                let _ = std::hint::black_box(match_node(
                    &config,
                    &event,
                    &node,
                    Some(&mut memoize),
                    None,
                ));
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, parse_and_compile, matching);
criterion_main!(benches);
