//! Built-in turbulence model catalogue.
//!
//! Constants follow the standard published calibrations; valid ranges are
//! the envelopes seen in recalibration studies.

use super::{ParameterSpec, TurbulenceModel};

/// Returns the built-in models in registration order.
pub(super) fn models() -> Vec<TurbulenceModel> {
    vec![k_epsilon(), k_omega_sst(), spalart_allmaras(), reynolds_stress()]
}

fn k_epsilon() -> TurbulenceModel {
    TurbulenceModel::new("k_epsilon", "k-ε (k-epsilon)")
        .with_description(
            "Two-equation eddy-viscosity model solving transport equations for turbulent \
             kinetic energy (k) and dissipation rate (ε)",
        )
        .with_category("RANS")
        .with_parameter(
            ParameterSpec::new("Cmu", "C_μ", 0.09)
                .with_description("Turbulent viscosity constant")
                .with_range(0.05, 0.15)
                .with_typical(0.08, 0.12)
                .with_aliases(["C_mu"]),
        )
        .with_parameter(
            ParameterSpec::new("C1e", "C_1ε", 1.44)
                .with_description("Dissipation equation constant C1")
                .with_range(1.2, 1.6)
                .with_typical(1.35, 1.50)
                .with_aliases(["C1epsilon", "C1_epsilon"]),
        )
        .with_parameter(
            ParameterSpec::new("C2e", "C_2ε", 1.92)
                .with_description("Dissipation equation constant C2")
                .with_range(1.8, 2.1)
                .with_typical(1.85, 2.0)
                .with_aliases(["C2epsilon", "C2_epsilon"]),
        )
        .with_parameter(
            ParameterSpec::new("sigma_k", "σ_k", 1.0)
                .with_description("Prandtl number for turbulent kinetic energy")
                .with_range(0.5, 2.0)
                .with_typical(0.8, 1.3),
        )
        .with_parameter(
            ParameterSpec::new("sigma_e", "σ_ε", 1.3)
                .with_description("Prandtl number for dissipation rate")
                .with_range(1.0, 1.8)
                .with_typical(1.2, 1.4)
                .with_aliases(["sigma_epsilon"]),
        )
        .with_regimes(["free_shear", "wall_bounded", "internal"])
        .with_applications([
            "Free shear flows",
            "Wall-bounded flows with mild pressure gradients",
            "Industrial flow applications",
            "Environmental flows",
        ])
        .with_limitations([
            "Poor performance in adverse pressure gradients",
            "Overestimates spreading rate of round jets",
            "Struggles with strong streamline curvature",
            "Not suitable for transitional flows",
        ])
}

fn k_omega_sst() -> TurbulenceModel {
    TurbulenceModel::new("k_omega_sst", "k-ω SST (Shear Stress Transport)")
        .with_description(
            "Hybrid model combining k-ω near walls with k-ε in the free stream, with a \
             cross-diffusion term and stress limiter",
        )
        .with_category("RANS")
        .with_parameter(
            ParameterSpec::new("beta_star", "β*", 0.09)
                .with_description("Closure coefficient for turbulent kinetic energy destruction")
                .with_range(0.05, 0.15)
                .with_typical(0.08, 0.12),
        )
        .with_parameter(
            ParameterSpec::new("alpha1", "α_1", 0.553)
                .with_description("Closure coefficient for ω equation in inner region")
                .with_range(0.4, 0.7)
                .with_typical(0.5, 0.6),
        )
        .with_parameter(
            ParameterSpec::new("beta1", "β_1", 0.075)
                .with_description("Closure coefficient for ω destruction in inner region")
                .with_range(0.05, 0.1)
                .with_typical(0.07, 0.08),
        )
        .with_parameter(
            ParameterSpec::new("alpha2", "α_2", 0.44)
                .with_description("Closure coefficient for ω equation in outer region")
                .with_range(0.3, 0.6)
                .with_typical(0.4, 0.5),
        )
        .with_parameter(
            ParameterSpec::new("beta2", "β_2", 0.0828)
                .with_description("Closure coefficient for ω destruction in outer region")
                .with_range(0.06, 0.12)
                .with_typical(0.07, 0.09),
        )
        .with_parameter(
            ParameterSpec::new("sigma_k1", "σ_k1", 0.85)
                .with_description("Prandtl number for k equation in inner region")
                .with_range(0.5, 1.2)
                .with_typical(0.8, 0.9),
        )
        .with_parameter(
            ParameterSpec::new("sigma_omega1", "σ_ω1", 0.5)
                .with_description("Prandtl number for ω equation in inner region")
                .with_range(0.3, 0.8)
                .with_typical(0.4, 0.6),
        )
        .with_parameter(
            ParameterSpec::new("sigma_k2", "σ_k2", 1.0)
                .with_description("Prandtl number for k equation in outer region")
                .with_range(0.7, 1.5)
                .with_typical(0.9, 1.2),
        )
        .with_parameter(
            ParameterSpec::new("sigma_omega2", "σ_ω2", 0.856)
                .with_description("Prandtl number for ω equation in outer region")
                .with_range(0.6, 1.2)
                .with_typical(0.8, 0.9),
        )
        .with_parameter(
            ParameterSpec::new("a1", "a_1", 0.31)
                .with_description("Stress limiter constant")
                .with_range(0.2, 0.5)
                .with_typical(0.25, 0.35),
        )
        .with_regimes(["wall_bounded", "separated", "adverse_pressure_gradient", "external"])
        .with_applications([
            "Adverse pressure gradient flows",
            "Separated flows",
            "Airfoil and wing aerodynamics",
            "Heat transfer applications",
            "Turbomachinery flows",
        ])
        .with_limitations([
            "Higher computational cost than standard k-ε",
            "Sensitive to freestream values in external flows",
            "May predict early transition in some cases",
        ])
}

fn spalart_allmaras() -> TurbulenceModel {
    TurbulenceModel::new("spalart_allmaras", "Spalart-Allmaras")
        .with_description(
            "One-equation model solving a transport equation for a modified turbulent \
             viscosity, designed for aerodynamic flows",
        )
        .with_category("RANS")
        .with_parameter(
            ParameterSpec::new("Cb1", "C_b1", 0.1355)
                .with_description("Production constant")
                .with_range(0.1, 0.2)
                .with_typical(0.13, 0.14),
        )
        .with_parameter(
            ParameterSpec::new("Cb2", "C_b2", 0.622)
                .with_description("Diffusion constant")
                .with_range(0.5, 0.8)
                .with_typical(0.6, 0.65),
        )
        .with_parameter(
            ParameterSpec::new("Cv1", "C_v1", 7.1)
                .with_description("Viscosity constant")
                .with_range(6.0, 8.0)
                .with_typical(7.0, 7.2),
        )
        .with_parameter(
            ParameterSpec::new("Cw1", "C_w1", 3.239)
                .with_description("Wall destruction constant")
                .with_range(3.0, 3.5)
                .with_typical(3.2, 3.3),
        )
        .with_parameter(
            ParameterSpec::new("Cw2", "C_w2", 0.3)
                .with_description("Wall destruction constant")
                .with_range(0.2, 0.4)
                .with_typical(0.25, 0.35),
        )
        .with_parameter(
            ParameterSpec::new("Cw3", "C_w3", 2.0)
                .with_description("Wall destruction constant")
                .with_range(1.5, 2.5)
                .with_typical(1.9, 2.1),
        )
        .with_parameter(
            ParameterSpec::new("sigma", "σ", 0.667)
                .with_description("Prandtl number for turbulent viscosity")
                .with_range(0.5, 1.0)
                .with_typical(0.6, 0.7),
        )
        .with_regimes(["external", "wall_bounded", "mild_separation"])
        .with_applications([
            "Aerodynamic flows around airfoils and wings",
            "External aerodynamics",
            "Flows with mild separation",
            "Aerospace applications",
        ])
        .with_limitations([
            "Primarily calibrated for aerodynamic flows",
            "Less suitable for free shear flows",
            "Limited performance in complex geometries",
            "Not ideal for heat transfer predictions",
        ])
}

fn reynolds_stress() -> TurbulenceModel {
    TurbulenceModel::new("reynolds_stress", "Reynolds Stress Model (RSM)")
        .with_description(
            "Seven-equation model solving transport equations for all Reynolds stress \
             components and the dissipation rate",
        )
        .with_category("RANS")
        .with_parameter(
            ParameterSpec::new("Cmu", "C_μ", 0.09)
                .with_description("Turbulent viscosity constant")
                .with_range(0.05, 0.15)
                .with_typical(0.08, 0.12)
                .with_aliases(["C_mu"]),
        )
        .with_parameter(
            ParameterSpec::new("C1e", "C_1ε", 1.44)
                .with_description("Dissipation equation constant C1")
                .with_range(1.2, 1.6)
                .with_typical(1.4, 1.5)
                .with_aliases(["C1epsilon", "C1_epsilon"]),
        )
        .with_parameter(
            ParameterSpec::new("C2e", "C_2ε", 1.92)
                .with_description("Dissipation equation constant C2")
                .with_range(1.8, 2.1)
                .with_typical(1.9, 2.0)
                .with_aliases(["C2epsilon", "C2_epsilon"]),
        )
        .with_parameter(
            ParameterSpec::new("C1", "C_1", 1.8)
                .with_description("Slow pressure-strain constant")
                .with_range(1.5, 2.2)
                .with_typical(1.7, 1.9),
        )
        .with_parameter(
            ParameterSpec::new("C2", "C_2", 0.6)
                .with_description("Rapid pressure-strain constant")
                .with_range(0.4, 0.8)
                .with_typical(0.55, 0.65),
        )
        .with_parameter(
            ParameterSpec::new("sigma_e", "σ_ε", 1.3)
                .with_description("Prandtl number for dissipation rate")
                .with_range(1.0, 1.8)
                .with_typical(1.2, 1.4)
                .with_aliases(["sigma_epsilon"]),
        )
        .with_parameter(
            ParameterSpec::new("sigma_k", "σ_k", 1.0)
                .with_description("Prandtl number for turbulent kinetic energy")
                .with_range(0.5, 2.0)
                .with_typical(0.8, 1.3),
        )
        .with_regimes(["swirling", "curved", "anisotropic", "buoyant"])
        .with_applications([
            "Complex flows with strong streamline curvature",
            "Swirling flows",
            "Flows with strong anisotropy",
            "Secondary flow prediction",
            "Buoyant flows",
        ])
        .with_limitations([
            "High computational cost",
            "Complex implementation",
            "Convergence difficulties",
            "Still relies on gradient-diffusion assumption for some terms",
        ])
}
