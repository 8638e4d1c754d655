//! Shared test fixtures for conversion and CLI tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A Chocofi keymap in the shape of a typical zmk-config repository:
/// home row mods, a text macro, a tap macro, combos, four layers and an
/// encoder binding.
pub const CORNE_KEYMAP: &str = r#"
/*
 * Copyright (c) 2020 The ZMK Contributors
 *
 * SPDX-License-Identifier: MIT
 */

#include <behaviors.dtsi>
#include <dt-bindings/zmk/bt.h>
#include <dt-bindings/zmk/keys.h>

&mt {
    tapping-term-ms = <180>;
    flavor = "balanced";
    require-prior-idle-ms = <125>;
};

/ {
    behaviors {
        mt0: mt0 {
            compatible = "zmk,behavior-hold-tap";
            #binding-cells = <2>;
            tapping-term-ms = <220>;
            flavor = "tap-preferred";
            bindings = <&kp>, <&kp>;
        };
    };

    macros {
        email: email {
            compatible = "zmk,behavior-macro";
            #binding-cells = <0>;
            bindings
                = <&macro_tap &kp LS(H) &kp I &kp DOT &kp T &kp H &kp E &kp R &kp E>;
        };

        copy_paste: copy_paste {
            compatible = "zmk,behavior-macro";
            #binding-cells = <0>;
            bindings = <&macro_tap &kp LC(C) &kp LC(V)>;
        };
    };

    combos {
        compatible = "zmk,combos";

        combo_esc {
            timeout-ms = <50>;
            key-positions = <1 2>;
            bindings = <&kp ESC>;
        };

        combo_caps {
            bindings = <&caps_word>;
            key-positions = <13 22>;
        };
    };

    keymap {
        compatible = "zmk,keymap";

        default_layer {
// -----------------------------------------------------------------------------------------
// |  TAB |  Q  |  W  |  E  |  R  |  T  |   |  Y  |  U   |  I  |  O  |  P  | BSPC |
// | CTRL |  A  |  S  |  D  |  F  |  G  |   |  H  |  J   |  K  |  L  |  ;  |  '   |
// | SHFT |  Z  |  X  |  C  |  V  |  B  |   |  N  |  M   |  ,  |  .  |  /  | ESC  |
//                    | GUI | LWR | SPC |   | ENT | RSE  | ALT |
            bindings = <
   &kp TAB   &kp Q        &kp W        &kp E        &kp R        &kp T       &kp Y &kp U        &kp I        &kp O        &kp P         &kp BSPC
   &kp LCTRL &mt0 LGUI A  &mt0 LALT S  &mt0 LCTRL D &mt0 LSHFT F &kp G       &kp H &mt RSHFT J  &mt RCTRL K  &mt RALT L   &mt RGUI SEMI &kp SQT
   &kp LSHFT &kp Z        &kp X        &kp C        &kp V        &kp B       &kp N &kp M        &kp COMMA    &kp DOT      &kp FSLH      &kp ESC
                                       &kp LGUI     &mo 1        &kp SPACE   &kp RET &lt 2 BSPC &kp RALT
            >;
            sensor-bindings = <&inc_dec_kp C_VOL_UP C_VOL_DN>;
        };

        lower_layer {
            bindings = <
   &kp TAB   &kp N1 &kp N2 &kp N3 &kp N4 &kp N5    &kp N6   &kp N7   &kp N8    &kp N9 &kp N0 &kp BSPC
   &bt BT_CLR &none &none  &none  &none  &none     &kp LEFT &kp DOWN &kp UP    &kp RIGHT &none &none
   &bt BT_SEL 0 &bt BT_SEL 1 &bt BT_SEL 2 &none &none &none   &none &none &none &none &none &none
                          &kp LGUI &trans &kp SPACE          &kp RET &to 3 &kp RALT
            >;
        };

        raise_layer {
            bindings = <
   &kp TAB  &kp EXCL &kp AT &kp HASH &kp DOLLAR &kp PRCNT     &kp CARET &kp AMPS &kp ASTRK &kp LPAR &kp RPAR &kp BSPC
   &kp LCTRL &none   &none  &none    &none      &none         &kp MINUS &kp EQUAL &kp LBKT &kp RBKT &kp BSLH &kp GRAVE
   &kp LSHFT &email  &copy_paste &none &none    &none         &kp UNDER &kp PLUS &kp LBRC &kp RBRC &kp PIPE &kp TILDE
                              &kp LGUI &trans &kp SPACE       &kp RET &trans &kp RALT
            >;
        };

        adjust_layer {
            bindings = <
   &kp F1 &kp F2 &kp F3 &kp F4 &kp F5 &kp F6
            >;
        };
    };
};
"#;

/// A keymap with one layer of 42 letter keys and nothing else.
///
/// Slot `i` holds letter `i % 26`: A..Z then A..P.
pub fn letters_keymap() -> String {
    let bindings: Vec<String> = (0..42u8)
        .map(|i| format!("&kp {}", char::from(b'A' + i % 26)))
        .collect();

    format!(
        "#include <behaviors.dtsi>\n/ {{\n    keymap {{\n        compatible = \"zmk,keymap\";\n        base_layer {{\n            bindings = <{}>;\n        }};\n    }};\n}};\n",
        bindings.join(" ")
    )
}

/// The Vial keycode of slot `i` in [`letters_keymap`].
pub fn letter_keycode(i: usize) -> String {
    format!("KC_{}", char::from(b'A' + (i % 26) as u8))
}

/// Writes `content` to `name` inside a fresh temp dir.
///
/// The returned TempDir must be kept alive while the file is used.
pub fn create_temp_file(name: &str, content: &str) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join(name);
    fs::write(&path, content).expect("Failed to write temp file");
    (path, temp_dir)
}

/// Writes [`CORNE_KEYMAP`] to a temp `corne.keymap`.
pub fn create_temp_keymap() -> (PathBuf, TempDir) {
    create_temp_file("corne.keymap", CORNE_KEYMAP)
}

/// A template that differs from the built-in default in every pass-through field.
pub fn template_json() -> serde_json::Value {
    let mut layout = Vec::new();
    for layer in 0..10 {
        let rows: Vec<serde_json::Value> = (0..8)
            .map(|_| serde_json::json!([format!("KC_F{}", layer + 1), -1, "KC_NO", "KC_NO", "KC_NO", "KC_NO"]))
            .collect();
        layout.push(serde_json::Value::Array(rows));
    }

    serde_json::json!({
        "version": 1,
        "uid": 1234567890123456789u64,
        "layout": layout,
        "encoder_layout": [[["KC_VOLD", "KC_VOLU"]], [], [], [], [], [], [], [], [], []],
        "layout_options": 0,
        "macro": [],
        "vial_protocol": 6,
        "via_protocol": 9,
        "tap_dance": [],
        "combo": [],
        "key_override": [{"trigger": "KC_BSPC"}],
        "alt_repeat_key": [],
        "settings": {"1": 1, "4": 300, "7": 50}
    })
}

/// Writes [`template_json`] to a temp `vial.vil`.
pub fn create_temp_template() -> (PathBuf, TempDir) {
    create_temp_file("vial.vil", &template_json().to_string())
}

/// Reads a written `.vil` file as JSON.
pub fn read_json(path: &Path) -> serde_json::Value {
    let content = fs::read_to_string(path).expect("Failed to read output");
    serde_json::from_str(&content).expect("Output should be valid JSON")
}
