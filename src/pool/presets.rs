//! Built-in endpoints for providers listed in the flat `name: [keys]` form

pub(crate) struct Preset {
    pub(crate) name: &'static str,
    pub(crate) base_url: &'static str,
    pub(crate) balance_url: Option<&'static str>,
    pub(crate) balance_field: &'static str,
    pub(crate) model_name: &'static str,
}

static PRESETS: &[Preset] = &[
    Preset {
        name: "siliconflow",
        base_url: "https://api.siliconflow.cn/v1",
        balance_url: Some("https://api.siliconflow.cn/v1/user/info"),
        balance_field: "data.balance",
        model_name: "zai-org/GLM-4.6",
    },
];

/// Case-insensitive lookup by provider name
pub(crate) fn find_preset(name: &str) -> Option<&'static Preset> {
    let name_lower = name.to_lowercase();
    PRESETS.iter().find(|p| p.name == name_lower)
}
