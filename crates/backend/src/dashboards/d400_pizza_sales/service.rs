use contracts::dashboards::d400_pizza_sales::{
    CalendarRequest, CalendarUnit, DashboardRequest, Direction, GroupedSummary, KpiBundle,
    KpiDisplay, KpiResponse, Measure, PizzaSalesDashboard, RankedRow, SalesFilter,
    ShareDimension, ShareRequest, TopRequest,
};
use contracts::domain::a100_order_line::OrderLine;
use thiserror::Error;

use super::engine::{self, EngineError};
use super::filter::{apply_filter, FilterError};
use crate::shared::format::{format_decimal, format_money, format_number};

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Build every chart of the dashboard for the filtered table.
///
/// Everything is recomputed from `table` on each call. Charts are
/// independent: a size code outside S..XXL leaves only `size_share` empty,
/// with the reason in `size_share_error`.
pub fn build_dashboard(
    table: &[OrderLine],
    request: &DashboardRequest,
    default_top_n: usize,
) -> Result<PizzaSalesDashboard, DashboardError> {
    let scope = apply_filter(table, &request.filter)?;
    let top_n = request.top_n.unwrap_or(default_top_n);

    let kpis = engine::compute_kpis(&scope);
    let (size_share, size_share_error) =
        match engine::percent_of_sales_by(&scope, ShareDimension::PizzaSize) {
            Ok(summary) => (Some(summary), None),
            Err(e) => {
                tracing::warn!("D400 Dashboard: size share unavailable: {}", e);
                (None, Some(e.to_string()))
            }
        };

    Ok(PizzaSalesDashboard {
        rows_in_scope: scope.len(),
        kpi_display: kpi_display(&kpis),
        kpis,
        monthly_orders: engine::group_by_calendar_unit(&scope, CalendarUnit::Month, Measure::OrderCount),
        daily_orders: engine::group_by_calendar_unit(&scope, CalendarUnit::DayOfWeek, Measure::OrderCount),
        hourly_orders: engine::group_by_calendar_unit(&scope, CalendarUnit::Hour, Measure::OrderCount),
        monthly_revenue: engine::group_by_calendar_unit(&scope, CalendarUnit::Month, Measure::Revenue),
        category_share: engine::percent_of_sales_by(&scope, ShareDimension::PizzaCategory)?,
        size_share,
        size_share_error,
        top_by_revenue: engine::top_n_by_measure(&scope, Measure::Revenue, top_n, Direction::Top),
        top_by_quantity: engine::top_n_by_measure(&scope, Measure::Quantity, top_n, Direction::Top),
        top_by_orders: engine::top_n_by_measure(&scope, Measure::OrderCount, top_n, Direction::Top),
        bottom_by_revenue: engine::top_n_by_measure(&scope, Measure::Revenue, top_n, Direction::Bottom),
    })
}

pub fn get_kpis(table: &[OrderLine], filter: &SalesFilter) -> Result<KpiResponse, DashboardError> {
    let scope = apply_filter(table, filter)?;
    let kpis = engine::compute_kpis(&scope);
    Ok(KpiResponse {
        rows_in_scope: scope.len(),
        display: kpi_display(&kpis),
        kpis,
    })
}

pub fn get_orders_by(
    table: &[OrderLine],
    request: &CalendarRequest,
) -> Result<GroupedSummary, DashboardError> {
    let scope = apply_filter(table, &request.filter)?;
    let measure = request.measure.unwrap_or(Measure::OrderCount);
    Ok(engine::group_by_calendar_unit(&scope, request.unit, measure))
}

pub fn get_sales_share(
    table: &[OrderLine],
    request: &ShareRequest,
) -> Result<GroupedSummary, DashboardError> {
    let scope = apply_filter(table, &request.filter)?;
    Ok(engine::percent_of_sales_by(&scope, request.dimension)?)
}

pub fn get_top_sellers(
    table: &[OrderLine],
    request: &TopRequest,
) -> Result<Vec<RankedRow>, DashboardError> {
    let scope = apply_filter(table, &request.filter)?;
    Ok(engine::top_n_by_measure(
        &scope,
        request.measure,
        request.n,
        request.direction,
    ))
}

/// Money to 2 decimals, counts with separators, rate to 2 decimals
pub fn kpi_display(kpis: &KpiBundle) -> KpiDisplay {
    KpiDisplay {
        total_revenue: format_money(kpis.total_revenue),
        total_orders: format_number(kpis.total_orders),
        avg_order_value: format_money(kpis.avg_order_value),
        total_pizzas_sold: format_number(kpis.total_pizzas_sold),
        avg_pizzas_per_order: format_decimal(kpis.avg_pizzas_per_order, 2),
    }
}

/// Write the headline KPIs to the log, formatted as on the dashboard
pub fn log_kpi_summary(kpis: &KpiBundle) {
    let kpi_text = kpi_display(kpis);
    tracing::info!("Total Revenue: {}", kpi_text.total_revenue);
    tracing::info!("Average Order Value: {}", kpi_text.avg_order_value);
    tracing::info!("Total Pizzas Sold: {}", kpi_text.total_pizzas_sold);
    tracing::info!("Total Orders: {}", kpi_text.total_orders);
    tracing::info!("Average Pizzas Per Order: {}", kpi_text.avg_pizzas_per_order);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn line(order_id: u64, day: u32, name: &str, category: &str, size: &str, price: f64) -> OrderLine {
        OrderLine {
            order_id,
            order_date: NaiveDate::from_ymd_opt(2015, 6, day).unwrap(),
            order_time: NaiveTime::from_hms_opt(12 + day % 8, 15, 0).unwrap(),
            pizza_name: name.to_string(),
            pizza_category: category.to_string(),
            pizza_size: size.to_string(),
            quantity: 1,
            total_price: price,
            pizza_id: None,
            pizza_name_id: None,
            unit_price: None,
            pizza_ingredients: None,
        }
    }

    fn table() -> Vec<OrderLine> {
        vec![
            line(1, 1, "The Hawaiian Pizza", "Classic", "M", 13.25),
            line(1, 1, "The Greek Pizza", "Classic", "XXL", 35.95),
            line(2, 2, "The Five Cheese Pizza", "Veggie", "L", 18.5),
            line(3, 3, "The Thai Chicken Pizza", "Chicken", "L", 20.75),
            line(4, 4, "The Big Meat Pizza", "Classic", "S", 12.0),
            line(5, 5, "The Spinach Supreme Pizza", "Supreme", "M", 16.5),
            line(6, 6, "The Hawaiian Pizza", "Classic", "L", 16.5),
        ]
    }

    #[test]
    fn test_full_dashboard() {
        let dashboard = build_dashboard(&table(), &DashboardRequest::default(), 5).unwrap();

        assert_eq!(dashboard.rows_in_scope, 7);
        assert_eq!(dashboard.kpis.total_orders, 6);
        assert_eq!(dashboard.kpi_display.total_revenue, "$133.45");
        assert_eq!(dashboard.kpi_display.total_orders, "6");
        assert_eq!(dashboard.kpi_display.avg_pizzas_per_order, "1.17");
        assert_eq!(dashboard.monthly_orders.labels(), vec!["June"]);
        assert_eq!(dashboard.monthly_revenue.measure, Measure::Revenue);
        let size_share = dashboard.size_share.unwrap();
        assert_eq!(size_share.labels(), vec!["S", "M", "L", "XXL"]);
        assert_eq!(dashboard.size_share_error, None);
        assert_eq!(dashboard.top_by_revenue.len(), 5);
        assert_eq!(dashboard.top_by_revenue[0].pizza_name, "The Greek Pizza");
        assert_eq!(dashboard.bottom_by_revenue[0].pizza_name, "The Big Meat Pizza");
        assert_eq!(dashboard.top_by_orders[0].pizza_name, "The Hawaiian Pizza");
    }

    #[test]
    fn test_filtered_dashboard_recomputes() {
        let request = DashboardRequest {
            filter: SalesFilter {
                categories: vec!["Classic".to_string()],
                ..Default::default()
            },
            top_n: Some(2),
        };
        let dashboard = build_dashboard(&table(), &request, 5).unwrap();

        assert_eq!(dashboard.rows_in_scope, 4);
        assert_eq!(dashboard.kpis.total_orders, 3);
        assert_eq!(dashboard.category_share.labels(), vec!["Classic"]);
        let pct = dashboard.category_share.rows[0].pct.unwrap();
        assert!((pct - 100.0).abs() < 1e-9);
        assert_eq!(dashboard.top_by_quantity.len(), 2);
    }

    #[test]
    fn test_empty_scope_is_not_an_error() {
        let request = DashboardRequest {
            filter: SalesFilter {
                date_from: NaiveDate::from_ymd_opt(2016, 1, 1),
                ..Default::default()
            },
            top_n: None,
        };
        let dashboard = build_dashboard(&table(), &request, 5).unwrap();

        assert_eq!(dashboard.rows_in_scope, 0);
        assert_eq!(dashboard.kpis, KpiBundle::default());
        assert_eq!(dashboard.kpi_display.avg_order_value, "$0.00");
        assert!(dashboard.size_share.unwrap().is_empty());
        assert!(dashboard.top_by_revenue.is_empty());
    }

    #[test]
    fn test_unknown_size_only_drops_size_share() {
        let mut lines = table();
        lines.push(line(7, 7, "The Greek Pizza", "Classic", "XXXL", 40.0));

        let dashboard = build_dashboard(&lines, &DashboardRequest::default(), 5).unwrap();
        assert!(dashboard.size_share.is_none());
        assert_eq!(
            dashboard.size_share_error.as_deref(),
            Some("unknown pizza_size value 'XXXL'")
        );
        // Charts that do not look at sizes still cover the row
        assert_eq!(dashboard.rows_in_scope, 8);
        assert_eq!(dashboard.kpis.total_orders, 7);
        assert_eq!(dashboard.kpi_display.total_revenue, "$173.45");
        assert_eq!(dashboard.category_share.labels(), vec!["Chicken", "Classic", "Supreme", "Veggie"]);
        assert_eq!(dashboard.top_by_revenue[0].pizza_name, "The Greek Pizza");
        assert_eq!(dashboard.daily_orders.rows.iter().map(|r| r.order_count).sum::<u64>(), 7);

        // The standalone size query still rejects it
        let err = get_sales_share(
            &lines,
            &ShareRequest {
                filter: SalesFilter::default(),
                dimension: ShareDimension::PizzaSize,
            },
        )
        .unwrap_err();
        assert!(matches!(err, DashboardError::Engine(EngineError::UnknownCategory { .. })));

        // Filtering the row out brings the size share back
        let request = DashboardRequest {
            filter: SalesFilter {
                sizes: vec!["S".into(), "M".into(), "L".into(), "XL".into(), "XXL".into()],
                ..Default::default()
            },
            top_n: None,
        };
        let filtered = build_dashboard(&lines, &request, 5).unwrap();
        assert!(filtered.size_share.is_some());
        assert_eq!(filtered.size_share_error, None);
    }

    #[test]
    fn test_single_queries() {
        let lines = table();

        let kpis = get_kpis(&lines, &SalesFilter::default()).unwrap();
        assert_eq!(kpis.rows_in_scope, 7);

        let by_day = get_orders_by(
            &lines,
            &CalendarRequest {
                filter: SalesFilter::default(),
                unit: CalendarUnit::DayOfWeek,
                measure: None,
            },
        )
        .unwrap();
        assert_eq!(by_day.measure, Measure::OrderCount);
        // June 1, 2015 was a Monday
        assert_eq!(by_day.labels()[0], "Monday");

        let share = get_sales_share(
            &lines,
            &ShareRequest {
                filter: SalesFilter::default(),
                dimension: ShareDimension::PizzaCategory,
            },
        )
        .unwrap();
        assert_eq!(share.rows.len(), 4);

        let worst = get_top_sellers(
            &lines,
            &TopRequest {
                filter: SalesFilter::default(),
                measure: Measure::Revenue,
                n: 1,
                direction: Direction::Bottom,
            },
        )
        .unwrap();
        assert_eq!(worst[0].pizza_name, "The Big Meat Pizza");
    }

    #[test]
    fn test_kpi_summary_logs_formatted_values() {
        let kpis = get_kpis(&table(), &SalesFilter::default()).unwrap().kpis;
        assert_eq!(kpi_display(&kpis).avg_order_value, "$22.24");
        log_kpi_summary(&kpis);
        log_kpi_summary(&KpiBundle::default());
    }

    #[test]
    fn test_inverted_range_is_filter_error() {
        let filter = SalesFilter {
            date_from: NaiveDate::from_ymd_opt(2015, 6, 5),
            date_to: NaiveDate::from_ymd_opt(2015, 6, 1),
            ..Default::default()
        };
        let err = get_kpis(&table(), &filter).unwrap_err();
        assert!(matches!(err, DashboardError::Filter(_)));
    }
}
