//! Gold-purchasable one-shot perks

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactEffect {
    /// +1 rocket now and per round
    ExtraRocket,
    /// +25% scrap per kill
    ScrapMagnet,
    /// +20% gold from world coins
    GoldenThrusters,
    /// +50 boost capacity
    EmergencyFuel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub gold_cost: u32,
    pub effect: ArtifactEffect,
}

pub const SCRAP_MAGNET_MULT: f32 = 1.25;
pub const GOLDEN_THRUSTERS_MULT: f32 = 1.2;
pub const EMERGENCY_FUEL_BOOST: f32 = 50.0;

pub static ARTIFACT_DEFS: &[ArtifactDef] = &[
    ArtifactDef {
        id: "extra_rocket",
        name: "Extra Rocket",
        description: "+1 rocket per round.",
        gold_cost: 150,
        effect: ArtifactEffect::ExtraRocket,
    },
    ArtifactDef {
        id: "scrap_magnet",
        name: "Scrap Magnet",
        description: "+25% scrap earned per kill.",
        gold_cost: 120,
        effect: ArtifactEffect::ScrapMagnet,
    },
    ArtifactDef {
        id: "golden_thrusters",
        name: "Golden Thrusters",
        description: "+20% gold from world coins.",
        gold_cost: 140,
        effect: ArtifactEffect::GoldenThrusters,
    },
    ArtifactDef {
        id: "emergency_fuel",
        name: "Emergency Fuel",
        description: "+50 max boost capacity.",
        gold_cost: 160,
        effect: ArtifactEffect::EmergencyFuel,
    },
];

pub fn artifact_def(id: &str) -> Option<&'static ArtifactDef> {
    ARTIFACT_DEFS.iter().find(|a| a.id == id)
}
