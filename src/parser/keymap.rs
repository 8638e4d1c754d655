//! ZMK keymap extraction.
//!
//! Recognition is pattern based: the comment-free source is split into
//! blocks once, and each pass below picks the block shapes it understands.
//! Nothing here fails on malformed input; unrecognized content is skipped.

use crate::keycode_db::KeycodeDb;
use crate::models::{
    Combo, KeyAction, Keymap, Layer, Macro, MacroAction, OrderedMap, TapDanceTable,
    TimingBehavior,
};
use crate::parser::bindings::BindingConverter;
use crate::parser::blocks::{scan_blocks, strip_comments, Block};
use anyhow::{Context, Result};
use std::path::Path;

/// Name the built-in `&mt { ... }` override is stored under.
const DEFAULT_MOD_TAP: &str = "mt";
/// `compatible` prefix of macro nodes.
const MACRO_COMPATIBLE: &str = "zmk,behavior-macro";
/// Node name of the layer container, with or without a label.
const KEYMAP_CONTAINER: &str = "keymap";
/// Conventional suffix of layer node names.
const LAYER_SUFFIX: &str = "_layer";

/// Reads and parses a ZMK keymap file.
///
/// # Errors
///
/// Returns an error only if the file cannot be read. Parsing itself never
/// fails.
pub fn parse_keymap_file(path: &Path, db: &KeycodeDb) -> Result<Keymap> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read keymap file: {}", path.display()))?;

    Ok(parse_keymap_str(&content, db))
}

/// Parses ZMK keymap source text into a [`Keymap`].
///
/// Passes run in dependency order: behaviors and macros first, since
/// bindings in combos and layers refer to them by name.
#[must_use]
pub fn parse_keymap_str(source: &str, db: &KeycodeDb) -> Keymap {
    let text = strip_comments(source);
    let blocks = scan_blocks(&text);

    let behaviors = extract_behaviors(&blocks);
    let macros = extract_macros(&blocks, db);
    let mut tap_dances = TapDanceTable::new();

    let mut converter = BindingConverter::new(db, &behaviors, &macros, &mut tap_dances);
    let combos = extract_combos(&blocks, &mut converter);
    let layers = extract_layers(&blocks, &mut converter);

    tracing::info!(
        "Parsed keymap: {} layers, {} behaviors, {} macros, {} combos, {} tap dances",
        layers.len(),
        behaviors.len(),
        macros.len(),
        combos.len(),
        tap_dances.len()
    );

    Keymap {
        layers,
        behaviors,
        macros,
        combos,
        tap_dances,
    }
}

/// Collects hold-tap timing from `NAME: NAME { ... }` nodes and the `&mt` override.
///
/// Missing properties keep the ZMK defaults. A name defined twice keeps its
/// first position but takes the later values.
#[must_use]
pub fn extract_behaviors(blocks: &[Block<'_>]) -> OrderedMap<TimingBehavior> {
    let mut behaviors = OrderedMap::new();

    for block in blocks {
        let name = if block.is_self_referential() {
            block.node_name()
        } else if block.reference() == Some(DEFAULT_MOD_TAP) {
            DEFAULT_MOD_TAP
        } else {
            continue;
        };

        let props = block.properties();
        let mut behavior = TimingBehavior::new(name);
        if let Some(term) = props.number("tapping-term-ms") {
            behavior.tapping_term_ms = term;
        }
        if let Some(flavor) = props.string("flavor") {
            behavior.flavor = flavor.to_string();
        }
        if let Some(idle) = props.number("require-prior-idle-ms") {
            behavior.require_prior_idle_ms = idle;
        }

        tracing::debug!(
            "Behavior '{}': tapping term {}ms, flavor {}, prior idle {}ms",
            name,
            behavior.tapping_term_ms,
            behavior.flavor,
            behavior.require_prior_idle_ms
        );
        behaviors.insert(name, behavior);
    }

    behaviors
}

/// Collects `zmk,behavior-macro` nodes.
///
/// The `&kp` keys of a macro become one text step when every key types a
/// character, and one tap step of translated keycodes otherwise.
#[must_use]
pub fn extract_macros(blocks: &[Block<'_>], db: &KeycodeDb) -> OrderedMap<Macro> {
    let mut macros = OrderedMap::new();

    for block in blocks.iter().filter(|b| b.is_self_referential()) {
        let props = block.properties();
        let is_macro = props
            .string("compatible")
            .is_some_and(|compatible| compatible.starts_with(MACRO_COMPATIBLE));
        if !is_macro {
            continue;
        }
        let Some(cells) = props.cells("bindings") else {
            continue;
        };

        let keys = key_presses(&cells);
        let actions = if keys.is_empty() {
            Vec::new()
        } else if let Some(text) = db.keys_to_text(&keys) {
            vec![MacroAction::Text(text)]
        } else {
            vec![MacroAction::Tap(
                keys.iter().map(|key| db.translate(key)).collect(),
            )]
        };

        macros.insert(block.node_name(), Macro { actions });
    }

    macros
}

/// The `KEY` of every `&kp KEY` pair, in order.
fn key_presses<'a>(cells: &[&'a str]) -> Vec<&'a str> {
    cells
        .windows(2)
        .filter(|pair| pair[0] == "&kp")
        .map(|pair| pair[1])
        .collect()
}

/// Collects every block with both `bindings` and `key-positions`.
pub fn extract_combos(blocks: &[Block<'_>], converter: &mut BindingConverter<'_>) -> Vec<Combo> {
    let mut combos = Vec::new();

    for block in blocks {
        let props = block.properties();
        let (Some(bindings), Some(positions)) =
            (props.cells("bindings"), props.cells("key-positions"))
        else {
            continue;
        };

        let key_positions = positions
            .iter()
            .filter_map(|cell| cell.parse::<u32>().ok())
            .collect();
        let result = converter.convert_single(&bindings);

        combos.push(Combo {
            key_positions,
            result,
        });
    }

    combos
}

/// Converts the layers of the first `keymap { ... }` container.
///
/// Children without bindings, or whose bindings yield no actions, are not
/// layers and are skipped.
pub fn extract_layers(blocks: &[Block<'_>], converter: &mut BindingConverter<'_>) -> Vec<Layer> {
    let Some(container) = blocks.iter().find(|b| b.node_name() == KEYMAP_CONTAINER) else {
        tracing::warn!("No keymap {{ ... }} block found, no layers extracted");
        return Vec::new();
    };

    let mut layers = Vec::new();
    for block in blocks.iter().filter(|b| container.is_parent_of(b)) {
        let props = block.properties();
        let Some(bindings) = props.cells("bindings") else {
            continue;
        };

        let name = block.node_name();
        let name = name.strip_suffix(LAYER_SUFFIX).unwrap_or(name);
        let keys: Vec<KeyAction> = converter.convert(&bindings);
        if keys.is_empty() {
            tracing::debug!("Skipping '{}': bindings produced no keys", name);
            continue;
        }

        layers.push(Layer::new(name, keys));
    }

    layers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::LAYER_KEY_COUNT;

    const SAMPLE: &str = r#"
#include <behaviors.dtsi>
#include <dt-bindings/zmk/keys.h>

&mt {
    tapping-term-ms = <170>;
    flavor = "balanced";
};

/ {
    behaviors {
        mt0: mt0 {
            compatible = "zmk,behavior-hold-tap";
            #binding-cells = <2>;
            tapping-term-ms = <200>;
            require-prior-idle-ms = <125>;
            bindings = <&kp>, <&kp>;
        };
    };

    macros {
        hi: hi {
            compatible = "zmk,behavior-macro";
            #binding-cells = <0>;
            bindings = <&macro_tap &kp H &kp I>;
        };
        fkeys: fkeys {
            compatible = "zmk,behavior-macro";
            #binding-cells = <0>;
            bindings = <&macro_tap &kp F1 &kp A>;
        };
    };

    combos {
        compatible = "zmk,combos";
        combo_esc {
            key-positions = <0 1>;
            bindings = <&kp ESC>;
        };
    };

    keymap {
        compatible = "zmk,keymap";

        base_layer {
            // &kp X
            bindings = <
                &kp Q &mt0 LGUI A &hi &mo 1
            >;
        };

        nav_layer {
            bindings = <&trans &mt LSHIFT A &fkeys>;
            sensor-bindings = <&inc_dec_kp C_VOL_UP C_VOL_DN>;
        };

        empty_layer {
            bindings = <>;
        };
    };
};
"#;

    fn db() -> KeycodeDb {
        KeycodeDb::load().unwrap()
    }

    fn keys(layer: &Layer) -> Vec<String> {
        layer.keys.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_sample_keymap() {
        let keymap = parse_keymap_str(SAMPLE, &db());

        assert_eq!(keymap.layers.len(), 2);
        assert_eq!(keymap.layers[0].name, "base");
        assert_eq!(keymap.layers[1].name, "nav");
        assert_eq!(&keys(&keymap.layers[0])[..4], ["KC_Q", "TD(0)", "M0", "MO(1)"]);
        assert_eq!(&keys(&keymap.layers[1])[..3], ["KC_TRNS", "TD(1)", "M1"]);
        assert!(keymap.layers.iter().all(|l| l.keys.len() == LAYER_KEY_COUNT));
    }

    #[test]
    fn test_behaviors_extracted() {
        let keymap = parse_keymap_str(SAMPLE, &db());

        let mt = keymap.behaviors.get("mt").unwrap();
        assert_eq!(mt.tapping_term_ms, 170);
        assert_eq!(mt.flavor, "balanced");

        let mt0 = keymap.behaviors.get("mt0").unwrap();
        assert_eq!(mt0.tapping_term_ms, 200);
        assert_eq!(mt0.require_prior_idle_ms, 125);
        assert_eq!(mt0.flavor, "tap-preferred");

        assert_eq!(keymap.default_behavior().unwrap().name, "mt");
    }

    #[test]
    fn test_tap_dances_take_owner_term() {
        let keymap = parse_keymap_str(SAMPLE, &db());
        let entries = keymap.tap_dances.entries();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].tapping_term_ms, 200);
        assert_eq!(entries[1].tapping_term_ms, 170);
        assert_eq!(entries[1].hold.to_string(), "KC_LSHIFT");
    }

    #[test]
    fn test_macros_text_and_tap_forms() {
        let keymap = parse_keymap_str(SAMPLE, &db());

        assert_eq!(keymap.macros.index_of("hi"), Some(0));
        assert_eq!(
            keymap.macros.get("hi").unwrap().actions,
            vec![MacroAction::Text("hi".into())]
        );
        assert_eq!(
            keymap.macros.get("fkeys").unwrap().actions,
            vec![MacroAction::Tap(vec![
                KeyAction::plain("KC_F1"),
                KeyAction::plain("KC_A"),
            ])]
        );
    }

    #[test]
    fn test_combos_extracted() {
        let keymap = parse_keymap_str(SAMPLE, &db());

        assert_eq!(keymap.combos.len(), 1);
        assert_eq!(keymap.combos[0].key_positions, vec![0, 1]);
        assert_eq!(keymap.combos[0].result.to_string(), "KC_ESCAPE");
    }

    #[test]
    fn test_combo_property_order_and_bad_positions() {
        let src = "c { bindings = <&kp TAB &kp Q>; key-positions = <3 x 4>; };";
        let keymap = parse_keymap_str(src, &db());

        assert_eq!(keymap.combos[0].key_positions, vec![3, 4]);
        // Only the first binding counts
        assert_eq!(keymap.combos[0].result.to_string(), "KC_TAB");
    }

    #[test]
    fn test_commented_out_nodes_ignored() {
        let src = r#"
/*
hm2: hm2 { tapping-term-ms = <300>; };
*/
keymap {
    // old_layer { bindings = <&kp A>; };
    base_layer { bindings = <&kp B>; };
};
"#;
        let keymap = parse_keymap_str(src, &db());
        assert!(keymap.behaviors.is_empty());
        assert_eq!(keymap.layers.len(), 1);
        assert_eq!(keymap.layers[0].name, "base");
    }

    #[test]
    fn test_missing_keymap_container() {
        let keymap = parse_keymap_str("/ { behaviors { }; };", &db());
        assert!(keymap.layers.is_empty());
    }

    #[test]
    fn test_labelled_keymap_container() {
        let src = r#"/ { km: keymap { compatible = "zmk,keymap"; base { bindings = <&kp A>; }; }; };"#;
        let keymap = parse_keymap_str(src, &db());
        assert_eq!(keymap.layers.len(), 1);
        assert_eq!(keymap.layers[0].name, "base");
        assert_eq!(keymap.layers[0].keys[0].to_string(), "KC_A");
    }

    #[test]
    fn test_combo_trailing_bindings_create_no_tap_dances() {
        let src = r#"
/ {
    combos {
        compatible = "zmk,combos";
        combo_esc { key-positions = <0 1>; bindings = <&kp ESC &mt LCTRL B>; };
    };
    keymap {
        base_layer { bindings = <&mt LGUI A>; };
    };
};
"#;
        let keymap = parse_keymap_str(src, &db());

        assert_eq!(keymap.combos[0].result.to_string(), "KC_ESCAPE");
        assert_eq!(keymap.tap_dances.len(), 1);
        assert_eq!(keymap.layers[0].keys[0].to_string(), "TD(0)");
    }

    #[test]
    fn test_behavior_redefinition_keeps_index() {
        let src = "a: a { tapping-term-ms = <100>; }; b: b { }; a: a { tapping-term-ms = <300>; };";
        let blocks = scan_blocks(src);
        let behaviors = extract_behaviors(&blocks);

        assert_eq!(behaviors.len(), 2);
        assert_eq!(behaviors.index_of("a"), Some(0));
        assert_eq!(behaviors.get("a").unwrap().tapping_term_ms, 300);
    }

    #[test]
    fn test_macro_without_key_presses() {
        let src = r#"m: m { compatible = "zmk,behavior-macro"; bindings = <&macro_wait_time 30>; };"#;
        let macros = extract_macros(&scan_blocks(src), &db());
        assert!(macros.get("m").unwrap().actions.is_empty());
    }

    #[test]
    fn test_parse_keymap_file_missing() {
        let result = parse_keymap_file(Path::new("/nonexistent/corne.keymap"), &db());
        assert!(result.is_err());
    }
}
