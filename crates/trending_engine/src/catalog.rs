//! The aspect trending pages and what each contributes to the report.

use trending_core::{LinkPolicy, PageSpec, Periodicity};

use crate::error::ConfigurationError;
use crate::extract::Category::{Div, Emphasis, Paragraph, Table, Teletype, H2, H3, H4};
use crate::registry::Registry;
use crate::select::{Pick, PickList};

pub const ASPECT_BASE_URL: &str = "https://cxc.cfa.harvard.edu/mta/ASPECT";

/// Credential site for the password-protected periscope drift reports.
pub const PERISCOPE_SITE: &str = "periscope_drift_page";

const RULE: Pick = Pick::Markup("<hr>");

const ACQ_STAT_REPORTS: &[Pick] = &[
    Pick::Element(H2, 0),
    Pick::SourceLink,
    Pick::Element(H3, 0),
    Pick::Element(Table, 1),
    Pick::CurrentImage("id_acq_stars.png"),
    Pick::Image("delta_mag_scatter.png"),
    Pick::Element(Table, 4),
    RULE,
];

const GUI_STAT_REPORTS: &[Pick] = &[
    Pick::Element(H2, 0),
    Pick::SourceLink,
    Pick::Element(H3, 0),
    Pick::Element(Table, 1),
    Pick::Markup("<table><tbody><tr><td>"),
    Pick::Image("delta_mag_vs_mag.png"),
    Pick::Markup("</td><td>"),
    Pick::Image("delta_mag_vs_color.png"),
    Pick::Markup("</td></tr><tr><td>"),
    Pick::Image("frac_not_track_vs_mag.png"),
    Pick::Markup("</td><td>"),
    Pick::Image("frac_bad_obc_status.png"),
    Pick::Markup("</td></tr></tbody></table>"),
    Pick::Element(Table, 4),
    RULE,
];

const PERISCOPE_DRIFT_REPORTS: &[Pick] = &[
    Pick::Element(H2, 0),
    Pick::SourceLink,
    Pick::Element(H3, 0),
    Pick::Element(Table, 1),
    Pick::Element(H3, 1),
    Pick::Image("drift_histogram.png"),
    Pick::Element(H3, 2),
    Pick::Markup("<table><tbody><tr><td>"),
    Pick::Image("large_drift_ang_y_corr.png"),
    Pick::Markup("</td><td>"),
    Pick::Image("large_drift_ang_z_corr.png"),
    Pick::Markup("</td></tr></tbody></table>"),
    RULE,
];

const PERIGEE_HEALTH_PLOTS: &[Pick] = &[
    Pick::Element(H3, 0),
    Pick::SourceLink,
    Pick::Element(Paragraph, 0),
    Pick::Element(Table, 1),
    RULE,
];

const WRONG_BOX_ANOM: &[Pick] = &[
    Pick::Element(H2, 0),
    Pick::SourceLink,
    Pick::Image("wrong_box.png"),
    Pick::Element(H4, 0),
    Pick::Element(Table, 1),
    RULE,
];

const KALMAN_WATCH3: &[Pick] = &[
    Pick::Element(H2, 0),
    Pick::SourceLink,
    Pick::Image("mon_win_kalman_drops_-45d_-1d.png"),
    Pick::Element(H3, 0),
    Pick::Element(Paragraph, 1),
    Pick::Element(Div, 0),
    Pick::Element(Table, 1),
    RULE,
];

const OBC_RATE_NOISE: &[Pick] = &[
    Pick::Element(H2, 0),
    Pick::SourceLink,
    Pick::Markup("<br>"),
    Pick::Following(H2, 0, 1),
    Pick::Markup("<br><br>"),
    Pick::Image("pitch_time_recent.png"),
    Pick::Image("yaw_time_recent.png"),
    Pick::Image("roll_time_recent.png"),
    Pick::Image("pitch_time_longterm.png"),
    Pick::Image("yaw_time_longterm.png"),
    Pick::Image("roll_time_longterm.png"),
    RULE,
];

const FID_DRIFT_MON3: &[Pick] = &[
    Pick::Element(H2, 0),
    Pick::SourceLink,
    Pick::Element(H4, 0),
    Pick::Following(H4, 0, 1),
    Pick::Markup("<br>"),
    Pick::Image("starcheck_telem.png"),
    Pick::Image("drift_acis_s.png"),
    RULE,
];

const AIMPOINT_MON3: &[Pick] = &[
    Pick::Element(H2, 0),
    Pick::SourceLink,
    Pick::Element(H3, 1),
    Pick::Following(H3, 1, 1),
    Pick::Element(Teletype, 0),
    Pick::Following(Teletype, 0, 1),
    Pick::Image("observed_aimpoints_dx.png"),
    Pick::Image("observed_aimpoints_dy.png"),
    Pick::Element(H3, 2),
    Pick::Following(H3, 2, 1),
    Pick::Element(Emphasis, 1),
    Pick::Following(Emphasis, 1, 1),
    Pick::Following(Emphasis, 1, 2),
    Pick::Following(Emphasis, 1, 3),
    Pick::Image("intra_obs_dy_dz.png"),
    RULE,
];

const CELMON: &[Pick] = &[
    Pick::Markup("<h2>Absolute astrometric accuracy</h2>"),
    Pick::SourceLink,
    Pick::Element(H4, 1),
    Pick::Element(Paragraph, 1),
    Pick::Element(Paragraph, 5),
    Pick::Image("offsets-ACIS-S-history.png"),
    Pick::Image("offsets-ACIS-I-history.png"),
    Pick::Image("offsets-HRC-S-history.png"),
    Pick::Image("offsets-HRC-I-history.png"),
    RULE,
];

const VV_RMS: &[Pick] = &[
    Pick::Element(H2, 0),
    Pick::Element(H3, 0),
    Pick::SourceLink,
    Pick::Markup("<br><br><table><tbody><tr><td>"),
    Pick::Image("hist2d_fig.png"),
    Pick::Markup("</td><td>"),
    Pick::Image("hist2d_fig_n100.png"),
    Pick::Markup("</td></tr></tbody></table>"),
    RULE,
];

const ATTITUDE_ERROR_MON: &[Pick] = &[
    Pick::Element(H2, 0),
    Pick::Following(H2, 0, 1),
    Pick::Markup("<br><br>"),
    Pick::SourceLink,
    Pick::Element(H3, 0),
    Pick::Element(Table, 1),
    Pick::Element(H3, 1),
    Pick::Element(Paragraph, 1),
    Pick::Element(Table, 2),
    Pick::Element(H2, 1),
    Pick::Element(Table, 3),
    Pick::Markup("<br></br><br></br>"),
    RULE,
];

const FSS_CHECK3: &[Pick] = &[
    Pick::Element(H2, 0),
    Pick::SourceLink,
    Pick::Markup("<br>"),
    Pick::Element(H3, 0),
    Pick::Element(Table, 1),
    Pick::Markup("<br>"),
    Pick::Element(H4, 1),
    Pick::Element(Table, 2),
    Pick::Element(H4, 2),
    Pick::Element(Table, 3),
    RULE,
];

/// Builds the registry of aspect trending pages rooted at `base_url`, in report order.
pub fn aspect_registry(base_url: &str) -> Result<Registry, ConfigurationError> {
    let page = |key: &str| PageSpec::new(key, base_url);
    let quarterly = |key: &str| page(key).with_periodicity(Periodicity::Quarterly);

    Registry::new()
        .with(quarterly("acq_stat_reports"), PickList(ACQ_STAT_REPORTS))?
        .with(quarterly("gui_stat_reports"), PickList(GUI_STAT_REPORTS))?
        .with(
            quarterly("periscope_drift_reports").requiring_auth(PERISCOPE_SITE),
            PickList(PERISCOPE_DRIFT_REPORTS),
        )?
        .with(
            page("perigee_health_plots").with_periodicity(Periodicity::Monthly),
            PickList(PERIGEE_HEALTH_PLOTS),
        )?
        .with(page("wrong_box_anom"), PickList(WRONG_BOX_ANOM))?
        .with(page("kalman_watch3"), PickList(KALMAN_WATCH3))?
        .with(page("obc_rate_noise/trending"), PickList(OBC_RATE_NOISE))?
        .with(page("fid_drift_mon3"), PickList(FID_DRIFT_MON3))?
        .with(page("aimpoint_mon3"), PickList(AIMPOINT_MON3))?
        .with(
            page("celmon").with_link_policy(LinkPolicy::Verbatim),
            PickList(CELMON),
        )?
        .with(page("vv_rms"), PickList(VV_RMS))?
        .with(page("attitude_error_mon"), PickList(ATTITUDE_ERROR_MON))?
        .with(page("fss_check3"), PickList(FSS_CHECK3))
}
