use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};

use super::{RegionCode, RegionNames};

/// Region names from the browser's `Intl.DisplayNames` in English.
///
/// Code enumeration goes through `Intl.supportedValuesOf("region")`; engines
/// that reject the `"region"` key make [`RegionNames::region_codes`] return
/// `None` and the catalog scans every letter pair instead.
pub struct IntlNames {
    display: JsValue,
    of: Function,
    codes: Option<Vec<RegionCode>>,
}

impl IntlNames {
    /// `None` when `Intl.DisplayNames` is missing or refuses to construct.
    pub fn new() -> Option<Self> {
        let intl = Reflect::get(&js_sys::global(), &JsValue::from_str("Intl"))
            .ok()
            .filter(|v| v.is_object())?;
        let ctor: Function = Reflect::get(&intl, &JsValue::from_str("DisplayNames")).ok()?.dyn_into().ok()?;

        let options = Object::new();
        Reflect::set(&options, &JsValue::from_str("type"), &JsValue::from_str("region")).ok()?;
        let args = Array::of2(&Array::of1(&JsValue::from_str("en")), &options);
        let display = Reflect::construct(&ctor, &args).ok()?;
        let of: Function = Reflect::get(&display, &JsValue::from_str("of")).ok()?.dyn_into().ok()?;

        Some(Self { display, of, codes: supported_regions(&intl) })
    }
}

fn supported_regions(intl: &JsValue) -> Option<Vec<RegionCode>> {
    let supported: Function = Reflect::get(intl, &JsValue::from_str("supportedValuesOf")).ok()?.dyn_into().ok()?;
    let values: Array = supported.call1(intl, &JsValue::from_str("region")).ok()?.dyn_into().ok()?;
    Some(
        values
            .iter()
            .filter_map(|v| v.as_string())
            .filter_map(|code| RegionCode::new(&code).ok())
            .collect(),
    )
}

impl RegionNames for IntlNames {
    fn region_codes(&self) -> Option<Vec<RegionCode>> {
        self.codes.clone()
    }

    fn display_name(&self, code: RegionCode) -> Option<String> {
        let name = self.of.call1(&self.display, &JsValue::from_str(code.as_str())).ok()?.as_string()?;
        // Unknown codes come back unchanged.
        (name != code.as_str()).then_some(name)
    }
}
