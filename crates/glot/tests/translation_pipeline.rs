//! End-to-end tests for the full rendering pipeline: collection
//! discovery, persisted rows, fallback resolution, pluralization,
//! converter dispatch, addons, dialect targets, and reload behavior.

use std::any::TypeId;
use std::sync::Arc;
use std::thread;

use glot::{
    ArgType, ArgValue, ArgumentFormat, CaseAddon, ConverterScope, Language, Localization,
    LocalizationConfig, Localize, MemoryStore, RenderFlags, StaticLanguages, Surround, TextCase,
    TranslateError, TranslateRequest, TranslationCollection, TranslationEntry, ValueConverter,
    ValueFormatParams, VariantName,
};
use tracing_test::traced_test;

fn languages() -> Arc<StaticLanguages> {
    Arc::new(StaticLanguages::new([
        Language::new("en", "English"),
        Language::new("es", "Spanish").fallback("en"),
        Language::new("de", "German").alias("deutsch"),
    ]))
}

fn service(store: Arc<MemoryStore>) -> Arc<Localization> {
    Localization::new(LocalizationConfig::new("en", "en-US"), languages(), store).unwrap()
}

fn chat_entries() -> Vec<TranslationEntry> {
    vec![
        TranslationEntry::new("greeting", "[#00ff80]Welcome, {0}![/]")
            .describe("Shown when a session opens")
            .argument(ArgumentFormat::new().named("player").expecting(ArgType::Text)),
        TranslationEntry::new("items", "You have {0} item{0:p}")
            .argument(ArgumentFormat::new().named("count").expecting(ArgType::Int)),
        TranslationEntry::new("motd", "Server of the day"),
    ]
}

#[test]
fn full_pipeline_renders_every_target() {
    let store = Arc::new(MemoryStore::new());
    let services = service(store);
    let collection = TranslationCollection::new("chat", services, chat_entries());

    let greeting = collection.get("greeting").unwrap();
    let name = "Ada".to_string();
    let args = [ArgValue::display(&name)];

    assert_eq!(
        greeting.translate(&TranslateRequest::new(), &args).unwrap(),
        "[#00ff80]Welcome, Ada![/]"
    );
    assert_eq!(
        greeting
            .translate(&TranslateRequest::new().with_flags(RenderFlags::rich()), &args)
            .unwrap(),
        "<color=#00ff80>Welcome, Ada!</color>"
    );
    assert_eq!(
        greeting
            .translate(
                &TranslateRequest::new().with_flags(RenderFlags::terminal()),
                &args
            )
            .unwrap(),
        "\u{1b}[38;2;0;255;128mWelcome, Ada!\u{1b}[39m"
    );
    assert_eq!(
        greeting
            .translate(
                &TranslateRequest::new().with_flags(RenderFlags::rich().stripped()),
                &args
            )
            .unwrap(),
        "Welcome, Ada!"
    );
}

#[test]
fn fallback_row_differs_from_original() {
    let store = Arc::new(MemoryStore::new());
    store.insert("chat", "en", "motd", "Message of the day");
    let services = service(Arc::clone(&store));
    let collection = TranslationCollection::new("chat", Arc::clone(&services), chat_entries());

    // "es" has no row; its fallback "en" row was loaded from the store
    // and differs from the authored default.
    let es = services.languages().find("es").unwrap();
    let motd = collection.get("motd").unwrap();
    assert_eq!(
        motd.value_for_language(Some(&es)).unwrap().raw(),
        "Message of the day"
    );

    // "de" has no row and no fallback: the authored default.
    let de = services.languages().find("deutsch").unwrap();
    let out = motd
        .translate(&TranslateRequest::new().in_language(&de), &[])
        .unwrap();
    assert_eq!(out, "Message of the day");
}

#[test]
fn pluralization_spans_follow_the_dialect() {
    let store = Arc::new(MemoryStore::new());
    let services = service(store);
    let collection = TranslationCollection::new(
        "chat",
        services,
        vec![
            TranslationEntry::new("haul", "[#ffcc00]{0} coin{0:p} collected[/]")
                .argument(ArgumentFormat::new().expecting(ArgType::Int)),
        ],
    );

    let haul = collection.get("haul").unwrap();
    let one = 1_i64;
    let many = 12_i64;
    assert_eq!(
        haul.translate(
            &TranslateRequest::new().with_flags(RenderFlags::terminal().stripped()),
            &[ArgValue::display(&one)]
        )
        .unwrap(),
        "1 coin collected"
    );
    assert_eq!(
        haul.translate(
            &TranslateRequest::new().with_flags(RenderFlags::rich()),
            &[ArgValue::display(&many)]
        )
        .unwrap(),
        "<color=#ffcc00>12 coins collected</color>"
    );
}

#[test]
fn custom_converters_and_addons_shape_arguments() {
    struct Meters;
    impl ValueConverter for Meters {
        fn can_convert(&self, value_type: TypeId) -> bool {
            value_type == TypeId::of::<f64>()
        }
        fn format(&self, value: ArgValue<'_>, _params: &ValueFormatParams<'_>) -> String {
            value
                .downcast_ref::<f64>()
                .map_or_else(String::new, |v| format!("{v:.1}m"))
        }
    }

    let store = Arc::new(MemoryStore::new());
    let services = service(store);
    services.converters().add_converter(Arc::new(Meters), 10).unwrap();

    let collection = TranslationCollection::new(
        "hud",
        services,
        vec![
            TranslationEntry::new("depth", "Depth: {0}").argument(
                ArgumentFormat::new()
                    .expecting(ArgType::Float)
                    .addon(Arc::new(Surround::new("[", "]")))
                    .addon(Arc::new(CaseAddon(TextCase::Upper))),
            ),
        ],
    );

    let depth = collection.get("depth").unwrap();
    let d = 3.26_f64;
    // Converter first, then addons in declared order.
    assert_eq!(
        depth
            .translate(&TranslateRequest::new(), &[ArgValue::display(&d)])
            .unwrap(),
        "Depth: [3.3M]"
    );
}

#[test]
fn self_localizing_values_bypass_converters() {
    struct Coordinates {
        x: i32,
        y: i32,
    }
    impl Localize for Coordinates {
        fn localize(&self, params: &ValueFormatParams<'_>) -> String {
            match params.language.name.as_str() {
                "es" => format!("({}, {}) ¡aquí!", self.x, self.y),
                _ => format!("({}, {})", self.x, self.y),
            }
        }
    }

    let store = Arc::new(MemoryStore::new());
    let services = service(store);
    let collection = TranslationCollection::new(
        "map",
        Arc::clone(&services),
        vec![
            TranslationEntry::new("position", "At {0}")
                .argument(ArgumentFormat::new().expecting(ArgType::Any)),
        ],
    );

    let position = collection.get("position").unwrap();
    let here = Coordinates { x: 4, y: -2 };
    assert_eq!(
        position
            .translate(&TranslateRequest::new(), &[ArgValue::localizing(&here)])
            .unwrap(),
        "At (4, -2)"
    );

    let es = services.languages().find("es").unwrap();
    assert_eq!(
        position
            .translate(
                &TranslateRequest::new().in_language(&es),
                &[ArgValue::localizing(&here)]
            )
            .unwrap(),
        "At (4, -2) ¡aquí!"
    );
}

#[test]
fn enum_arguments_render_their_variant_names() {
    enum Outcome {
        FlawlessVictory,
    }
    impl VariantName for Outcome {
        fn variant_name(&self) -> &'static str {
            "FlawlessVictory"
        }
        fn enum_name(&self) -> &'static str {
            "MatchOutcome"
        }
    }

    let store = Arc::new(MemoryStore::new());
    let services = service(store);
    let collection = TranslationCollection::new(
        "arena",
        Arc::clone(&services),
        vec![
            TranslationEntry::new("result", "Result: {0}")
                .argument(ArgumentFormat::new().expecting(ArgType::Any)),
        ],
    );

    let result = collection.get("result").unwrap();
    let outcome = Outcome::FlawlessVictory;
    assert_eq!(
        result
            .translate(&TranslateRequest::new(), &[ArgValue::enumeration(&outcome)])
            .unwrap(),
        "Result: Flawless Victory"
    );
    assert_eq!(
        services
            .converters()
            .format_enum_name(ArgValue::enumeration(&outcome)),
        "Match Outcome"
    );
}

#[test]
fn enum_scope_cross_registration_is_rejected() {
    struct EnumOnly;
    impl ValueConverter for EnumOnly {
        fn scope(&self) -> ConverterScope {
            ConverterScope::EnumOnly
        }
        fn can_convert(&self, _value_type: TypeId) -> bool {
            true
        }
        fn format(&self, _value: ArgValue<'_>, _params: &ValueFormatParams<'_>) -> String {
            String::new()
        }
    }

    let store = Arc::new(MemoryStore::new());
    let services = service(store);
    assert!(services.converters().add_converter(Arc::new(EnumOnly), 0).is_err());
}

#[test]
fn uninitialized_translation_reports_misuse() {
    let t = glot::Translation::new();
    assert_eq!(
        t.translate(&TranslateRequest::new(), &[]).unwrap_err(),
        TranslateError::Uninitialized
    );
}

#[traced_test]
#[test]
fn reload_warns_and_skips_bad_rows() {
    let store = Arc::new(MemoryStore::new());
    let services = service(Arc::clone(&store));
    let collection = TranslationCollection::new("chat", Arc::clone(&services), chat_entries());
    let _ = collection.len();

    store.insert("chat", "es", "no-such-key", "Hola");
    store.insert("chat", "tlh", "motd", "nuqneH");
    // "items" declares one argument; {3} is out of range.
    store.insert("chat", "es", "items", "Tienes {3}");
    store.insert("chat", "es", "motd", "Mensaje del día");
    collection.reload().unwrap();

    assert!(logs_contain("unknown key"));
    assert!(logs_contain("unknown language"));
    assert!(logs_contain("beyond the declared arity"));

    // The good row still landed.
    let es = services.languages().find("es").unwrap();
    let motd = collection.get("motd").unwrap();
    assert_eq!(
        motd.value_for_language(Some(&es)).unwrap().raw(),
        "Mensaje del día"
    );
    // The bad rows did not.
    assert!(collection.get("no-such-key").is_none());
    let items = collection.get("items").unwrap();
    assert_eq!(
        items.value_for_language(Some(&es)).unwrap().raw(),
        "You have {0} item{0:p}"
    );
}

#[test]
fn concurrent_readers_see_whole_values() {
    let store = Arc::new(MemoryStore::new());
    let services = service(store);
    let collection = Arc::new(TranslationCollection::new(
        "chat",
        Arc::clone(&services),
        chat_entries(),
    ));
    let motd = collection.get("motd").unwrap();
    let en = services.languages().find("en").unwrap();

    thread::scope(|scope| {
        let reader_motd = Arc::clone(&motd);
        scope.spawn(move || {
            for _ in 0..500 {
                let out = reader_motd.translate(&TranslateRequest::new(), &[]).unwrap();
                // Updates swap whole values: a reader sees one text or
                // the other, never a blend.
                assert!(out == "Server of the day" || out == "Signal of the day");
            }
        });
        scope.spawn(move || {
            for i in 0..500 {
                let text = if i % 2 == 0 {
                    "Signal of the day"
                } else {
                    "Server of the day"
                };
                motd.update_value(text, &en).unwrap();
            }
        });
    });
}
