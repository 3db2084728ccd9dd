//! Parameter records for the `helm` commands the plugin can run.
//!
//! Collection-valued helm options (`--set`, `--values`, ...) are not
//! representable as plugin parameters and are left out.
use drone_plugin_helper::runner::Command;
use drone_plugin_helper::{command_set, record};

record! {
    /// Options available for every helm command.
    #[derive(Debug, Default)]
    pub struct GlobalParams {
        command: Command,
        debug: bool,
        home: String,
        host: String,
        kube_context: String,
        kubeconfig: String,
        tiller_connection_timeout: i32,
        tiller_namespace: String,
        help: bool,
    }
}

record! {
    /// Chart lookup options shared by `fetch`, `inspect`, `install` and
    /// `upgrade`.
    #[derive(Debug, Default)]
    pub struct ChartParams {
        ca_file: String,
        cert_file: String,
        key_file: String,
        keyring: String,
        password: String,
        repo: String,
        username: String,
        verify: bool,
        version: String,
        chart: String = ",positional",
    }
}

record! {
    /// Options for talking to Tiller over TLS.
    #[derive(Debug, Default)]
    pub struct TLSParams {
        tls: bool,
        tls_ca_cert: String,
        tls_cert: String,
        tls_hostname: String,
        tls_key: String,
        tls_verify: bool,
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct CreateParams {
        global: GlobalParams,
        name: String = ",positional",
        starter: String,
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct DeleteParams {
        global: GlobalParams,
        description: String,
        dry_run: bool,
        no_hooks: bool,
        purge: bool,
        timeout: i32,
        tls: TLSParams,
        release_name: String = ",positional",
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct DependencyBuildParams {
        global: GlobalParams,
        keyring: String,
        verify: bool,
        chart: String = ",positional",
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct DependencyListParams {
        global: GlobalParams,
        chart: String = ",positional",
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct DependencyUpdateParams {
        global: GlobalParams,
        keyring: String,
        skip_refresh: bool,
        verify: bool,
        chart: String = ",positional",
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct FetchParams {
        global: GlobalParams,
        destination: String,
        devel: bool,
        prov: bool,
        untar: bool,
        untardir: String,
        chart: ChartParams,
    }
}

record! {
    /// Options for `get` and its subcommands.
    #[derive(Debug, Default)]
    pub struct GetParams {
        global: GlobalParams,
        revision: i32,
        tls: TLSParams,
        release_name: String = ",positional",
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct GetValuesParams {
        get: GetParams,
        all: bool,
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct HistoryParams {
        global: GlobalParams,
        col_width: u32,
        max: i32,
        output: String,
        tls: TLSParams,
        release_name: String = ",positional",
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct InitParams {
        global: GlobalParams,
        canary_image: bool,
        client_only: bool,
        dry_run: bool,
        force_upgrade: bool,
        history_max: i32,
        local_repo_url: String,
        net_host: bool,
        node_selectors: String,
        output: String,
        replicas: i32,
        service_account: String,
        skip_refresh: bool,
        stable_repo_url: String,
        tiller_image: String,
        tiller_tls: bool,
        tiller_tls_cert: String,
        tiller_tls_key: String,
        tiller_tls_verify: bool,
        tls_ca_cert: String,
        upgrade: bool,
        wait: bool,
    }
}

record! {
    /// Options for `inspect` and its subcommands.
    #[derive(Debug, Default)]
    pub struct InspectParams {
        global: GlobalParams,
        chart: ChartParams,
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct InstallParams {
        global: GlobalParams,
        tls: TLSParams,
        dep_up: bool,
        description: String,
        devel: bool,
        dry_run: bool,
        name: String,
        name_template: String,
        namespace: String,
        no_crd_hook: bool,
        no_hooks: bool,
        replace: bool,
        timeout: i32,
        wait: bool,
        chart: ChartParams,
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct LintParams {
        global: GlobalParams,
        namespace: String,
        strict: bool,
        path: String = ",positional",
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct ListParams {
        global: GlobalParams,
        all: bool,
        col_width: u32,
        date: bool,
        deleted: bool,
        deployed: bool,
        failed: bool,
        max: i32,
        namespace: String,
        offset: String,
        output: String,
        pending: bool,
        reverse: bool,
        short: bool,
        tls: TLSParams,
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct PackageParams {
        global: GlobalParams,
        app_version: String,
        dependency_update: bool,
        destination: String,
        key: String,
        keyring: String,
        save: bool,
        sign: bool,
        version: String,
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct PluginInstallParams {
        global: GlobalParams,
        path: String = ",positional",
        version: String,
    }
}

record! {
    /// Options for `plugin remove` and `plugin update`.
    #[derive(Debug, Default)]
    pub struct PluginParams {
        global: GlobalParams,
        plugin: String = ",positional",
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct RepoAddParams {
        global: GlobalParams,
        ca_file: String,
        cert_file: String,
        key_file: String,
        no_update: bool,
        password: String,
        username: String,
        name: String = ",positional",
        url: String = ",positional",
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct RepoIndexParams {
        global: GlobalParams,
        merge: String,
        url: String,
        directory: String = ",positional",
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct RepoRemoveParams {
        global: GlobalParams,
        name: String = ",positional",
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct ResetParams {
        global: GlobalParams,
        force: bool,
        remove_helm_home: bool,
        tls: TLSParams,
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct RollbackParams {
        global: GlobalParams,
        description: String,
        dry_run: bool,
        force: bool,
        no_hooks: bool,
        recreate_pods: bool,
        timeout: i32,
        tls: TLSParams,
        wait: bool,
        release: String = ",positional",
        revision: String = ",positional",
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct SearchParams {
        global: GlobalParams,
        col_width: u32,
        regexp: bool,
        version: String,
        versions: bool,
        keyword: String = ",positional",
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct ServeParams {
        global: GlobalParams,
        address: String,
        repo_path: String,
        url: String,
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct StatusParams {
        global: GlobalParams,
        output: String,
        revision: i32,
        tls: TLSParams,
        release_name: String = ",positional",
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct TemplateParams {
        global: GlobalParams,
        is_upgrade: bool,
        kube_version: String,
        name: String,
        name_template: String,
        notes: bool,
        output_dir: String,
        chart: String = ",positional",
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct TestParams {
        global: GlobalParams,
        cleanup: bool,
        timeout: i32,
        tls: TLSParams,
        release: String = ",positional",
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct UpgradeParams {
        global: GlobalParams,
        tls: TLSParams,
        description: String,
        devel: bool,
        dry_run: bool,
        force: bool,
        install: bool,
        namespace: String,
        no_hooks: bool,
        recreate_pods: bool,
        reset_values: bool,
        reuse_values: bool,
        timeout: i32,
        wait: bool,
        release: String = ",positional",
        chart: ChartParams,
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct VerifyParams {
        global: GlobalParams,
        keyring: String,
        path: String = ",positional",
    }
}

record! {
    #[derive(Debug, Default)]
    pub struct VersionParams {
        global: GlobalParams,
        client: bool,
        server: bool,
        short: bool,
        template: String,
        tls: TLSParams,
    }
}

command_set! {
    /// Every helm command the plugin knows how to run.
    #[derive(Debug)]
    pub enum HelmCommand {
        "help" => Help(GlobalParams),
        "create" => Create(CreateParams),
        "delete" => Delete(DeleteParams),
        "dependency build" => DependencyBuild(DependencyBuildParams),
        "dependency list" => DependencyList(DependencyListParams),
        "dependency update" => DependencyUpdate(DependencyUpdateParams),
        "fetch" => Fetch(FetchParams),
        "get" => Get(GetParams),
        "get hooks" => GetHooks(GetParams),
        "get manifest" => GetManifest(GetParams),
        "get values" => GetValues(GetValuesParams),
        "history" => History(HistoryParams),
        "home" => Home(GlobalParams),
        "init" => Init(InitParams),
        "inspect" => Inspect(InspectParams),
        "inspect chart" => InspectChart(InspectParams),
        "inspect readme" => InspectReadme(InspectParams),
        "inspect values" => InspectValues(InspectParams),
        "install" => Install(InstallParams),
        "lint" => Lint(LintParams),
        "list" => List(ListParams),
        "package" => Package(PackageParams),
        "plugin install" => PluginInstall(PluginInstallParams),
        "plugin list" => PluginList(GlobalParams),
        "plugin remove" => PluginRemove(PluginParams),
        "plugin update" => PluginUpdate(PluginParams),
        "repo add" => RepoAdd(RepoAddParams),
        "repo index" => RepoIndex(RepoIndexParams),
        "repo list" => RepoList(GlobalParams),
        "repo remove" => RepoRemove(RepoRemoveParams),
        "repo update" => RepoUpdate(GlobalParams),
        "reset" => Reset(ResetParams),
        "rollback" => Rollback(RollbackParams),
        "search" => Search(SearchParams),
        "serve" => Serve(ServeParams),
        "status" => Status(StatusParams),
        "template" => Template(TemplateParams),
        "test" => Test(TestParams),
        "upgrade" => Upgrade(UpgradeParams),
        "verify" => Verify(VerifyParams),
        "version" => Version(VersionParams),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use drone_plugin_helper::Error;
    use drone_plugin_helper::args::Serializer;
    use drone_plugin_helper::env::{Vars, extract};
    use drone_plugin_helper::exec::SystemLauncher;
    use drone_plugin_helper::names::Initialisms;
    use drone_plugin_helper::runner::{CommandSet, Completion, Runner, Settings};

    fn dry_run(strict: bool, env: &[(&str, &str)]) -> Result<Vec<String>, Error> {
        let initialisms = Initialisms::common().unwrap();
        let vars: Vars = extract(env.iter().copied(), "PLUGIN_", initialisms);
        let settings = Settings {
            strict,
            dry_run: true,
        };
        let outcome = Runner::new(settings, initialisms, SystemLauncher)
            .exec_command::<HelmCommand>("helm", &vars)?;
        assert_eq!(outcome.completion, Completion::DryRun);
        assert_eq!(outcome.invocation.program, "helm");
        Ok(outcome.invocation.args)
    }

    #[test]
    fn every_command_record_serializes() {
        let serializer = Serializer::new(Initialisms::common().unwrap());
        for key in HelmCommand::keys() {
            let command = HelmCommand::select(key).unwrap();
            assert!(
                serializer.serialize(command.record()).is_ok(),
                "record for '{key}' should serialize"
            );
        }
    }

    #[test]
    fn install_orders_command_flags_and_chart() {
        let args = dry_run(
            true,
            &[
                ("PLUGIN_COMMAND", "install"),
                ("PLUGIN_CHART", "stable/nginx"),
                ("PLUGIN_NAMESPACE", "web"),
                ("PLUGIN_TLS", "true"),
                ("PLUGIN_TLS_CA_CERT", "/ca.pem"),
                ("PLUGIN_TIMEOUT", "300"),
                ("PLUGIN_DEBUG", "1"),
            ],
        )
        .unwrap();
        assert_eq!(
            args,
            [
                "install",
                "--debug",
                "--tls",
                "--tls-ca-cert",
                "/ca.pem",
                "--namespace",
                "web",
                "--timeout",
                "300",
                "stable/nginx",
            ]
        );
    }

    #[test]
    fn repo_add_takes_two_positionals() {
        let args = dry_run(
            true,
            &[
                ("PLUGIN_COMMAND", "repo"),
                ("PLUGIN_SUBCOMMAND", "add"),
                ("PLUGIN_NAME", "stable"),
                ("PLUGIN_URL", "https://charts.example.com"),
            ],
        )
        .unwrap();
        assert_eq!(
            args,
            ["repo", "add", "stable", "https://charts.example.com"]
        );
    }

    #[test]
    fn init_uses_initialisms_in_flags() {
        let args = dry_run(
            true,
            &[
                ("PLUGIN_COMMAND", "init"),
                ("PLUGIN_LOCAL_REPO_URL", "http://127.0.0.1:8879"),
                ("PLUGIN_TILLER_TLS", "yes"),
            ],
        )
        .unwrap();
        assert_eq!(
            args,
            [
                "init",
                "--local-repo-url",
                "http://127.0.0.1:8879",
                "--tiller-tls"
            ]
        );
    }

    #[test]
    fn get_values_puts_command_words_first() {
        let args = dry_run(
            true,
            &[
                ("PLUGIN_COMMAND", "get"),
                ("PLUGIN_SUBCOMMAND", "values"),
                ("PLUGIN_ALL", "true"),
                ("PLUGIN_RELEASE_NAME", "web"),
            ],
        )
        .unwrap();
        assert_eq!(args, ["get", "values", "web", "--all"]);
    }

    #[test]
    fn strict_mode_rejects_collection_parameters() {
        let err = dry_run(
            true,
            &[("PLUGIN_COMMAND", "install"), ("PLUGIN_VALUES", "a.yaml")],
        )
        .unwrap_err();
        assert!(matches!(err, Error::Unused(ref keys) if keys == &["Values"]));
    }

    #[test]
    fn unknown_command_is_rejected() {
        let err = dry_run(false, &[("PLUGIN_COMMAND", "explode")]).unwrap_err();
        assert!(matches!(err, Error::UnknownCommand(ref key) if key == "explode"));
    }
}
